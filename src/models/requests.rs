//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::FieldError;
use crate::products::Product;

/// Request body for creating (POST) or replacing (PUT) a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl ProductRequest {
    /// Validates the request data
    ///
    /// Returns one entry per failing field; empty when the request is valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        }
        if self.price.is_nan() || self.price <= 0.0 {
            errors.push(FieldError::new("price", "Price must be positive"));
        }
        errors
    }

    /// Builds a new product with a fresh id.
    pub fn into_new_product(self) -> Product {
        Product::new(self.name, self.description, self.price)
    }

    /// Builds the replacement value for the product `id`.
    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            ..self.into_new_product()
        }
    }
}
