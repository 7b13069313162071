use serde::{Deserialize, Serialize};

use crate::models::{OrderLine, OrderRequest, Product};
use crate::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Client-side basket. Each product appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit, merging with an existing line for the same product.
    pub fn add_item(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.product_id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            }),
        }
    }

    pub fn remove_item(&mut self, product_id: i64) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Quantities below 1 are raised to 1; use `remove_item` to drop a line.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.product_id == product_id) {
            item.quantity = quantity.max(1);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity`, rounded to cents.
    pub fn total_amount(&self) -> f64 {
        let total: f64 = self
            .items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum();
        (total * 100.0).round() / 100.0
    }

    pub fn to_order(&self) -> Result<OrderRequest, ClientError> {
        if self.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        Ok(OrderRequest {
            items: self
                .items
                .iter()
                .map(|item| OrderLine {
                    product: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.price,
                })
                .collect(),
            total_amount: self.total_amount(),
        })
    }
}
