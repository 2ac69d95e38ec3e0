//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityRef;

/// Shipping charge assumed when a product has none recorded
pub const DEFAULT_SHIPPING_CHARGE: Decimal = Decimal::from_parts(550, 0, 0, false, 0);

/// Product entity as listed by `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub shipping_charge: Option<Decimal>,
    #[serde(default)]
    pub category: Option<EntityRef>,
    #[serde(default)]
    pub subcategory: Option<EntityRef>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(EntityRef::id)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(EntityRef::name)
    }

    pub fn subcategory_id(&self) -> Option<&str> {
        self.subcategory.as_ref().map(EntityRef::id)
    }

    pub fn subcategory_name(&self) -> Option<&str> {
        self.subcategory.as_ref().and_then(EntityRef::name)
    }

    /// Price for display and ordering; missing prices count as zero
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// Shipping charge for display; missing charges show the default
    pub fn shipping_or_default(&self) -> Decimal {
        self.shipping_charge.unwrap_or(DEFAULT_SHIPPING_CHARGE)
    }
}

/// Update product payload (`PUT /products/:id`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_charge: Decimal,
    /// Category reference (id)
    pub category: String,
    /// Subcategory reference (id), omitted when none is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}
