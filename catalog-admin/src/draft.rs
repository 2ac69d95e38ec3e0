//! Edit draft and submit-time coercion
//!
//! A draft mirrors a [`Product`] while it is being edited. Money fields
//! are kept as the raw text the operator typed and only become numbers
//! in [`EditDraft::to_update`], which refuses anything that is not a
//! non-negative decimal instead of quietly sending zero.

use std::str::FromStr;

use shared::{Decimal, DEFAULT_SHIPPING_CHARGE, Product, ProductUpdate};
use thiserror::Error;

/// Editable field of a draft, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Price,
    ShippingCharge,
    Category,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Product name",
            DraftField::Price => "Price",
            DraftField::ShippingCharge => "Shipping charge",
            DraftField::Category => "Category",
        }
    }
}

/// Local validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{} is required", .0.label())]
    Blank(DraftField),

    #[error("{} must be a number, got '{value}'", .field.label())]
    NotNumeric { field: DraftField, value: String },

    #[error("{} cannot be negative", .0.label())]
    Negative(DraftField),

    #[error("Category is required")]
    MissingCategory,
}

impl DraftError {
    pub fn field(&self) -> DraftField {
        match self {
            DraftError::Blank(field) | DraftError::Negative(field) => *field,
            DraftError::NotNumeric { field, .. } => *field,
            DraftError::MissingCategory => DraftField::Category,
        }
    }
}

/// Transient editable copy of a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub name: String,
    pub description: String,
    /// Raw price text
    pub price: String,
    /// Raw shipping charge text
    pub shipping_charge: String,
    category: String,
    subcategory: String,
}

impl EditDraft {
    /// Initialize a draft from a listed product
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.map(|p| p.to_string()).unwrap_or_default(),
            shipping_charge: product
                .shipping_charge
                .unwrap_or(DEFAULT_SHIPPING_CHARGE)
                .to_string(),
            category: product.category_id().unwrap_or_default().to_string(),
            subcategory: product.subcategory_id().unwrap_or_default().to_string(),
        }
    }

    /// Selected category id, empty when none
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Selected subcategory id, empty when none
    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    /// Select a category. A different category drops the subcategory,
    /// which belonged to the old one. Returns whether anything changed.
    pub(crate) fn select_category(&mut self, category_id: &str) -> bool {
        if self.category == category_id {
            return false;
        }
        self.category = category_id.to_string();
        self.subcategory.clear();
        true
    }

    pub(crate) fn select_subcategory(&mut self, subcategory_id: &str) {
        self.subcategory = subcategory_id.to_string();
    }

    /// Every validation failure, in form order
    pub fn validate(&self) -> Vec<DraftError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(DraftError::Blank(DraftField::Name));
        }
        if let Err(e) = parse_amount(DraftField::Price, &self.price) {
            errors.push(e);
        }
        if let Err(e) = parse_amount(DraftField::ShippingCharge, &self.shipping_charge) {
            errors.push(e);
        }
        if self.category.is_empty() {
            errors.push(DraftError::MissingCategory);
        }
        errors
    }

    /// Coerce into the update payload, reporting the first failure
    pub fn to_update(&self) -> Result<ProductUpdate, DraftError> {
        if let Some(first) = self.validate().into_iter().next() {
            return Err(first);
        }
        Ok(ProductUpdate {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            price: parse_amount(DraftField::Price, &self.price)?,
            shipping_charge: parse_amount(DraftField::ShippingCharge, &self.shipping_charge)?,
            category: self.category.clone(),
            subcategory: (!self.subcategory.is_empty()).then(|| self.subcategory.clone()),
        })
    }
}

/// Parse a money field: trimmed, non-blank, decimal, not negative
pub fn parse_amount(field: DraftField, raw: &str) -> Result<Decimal, DraftError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DraftError::Blank(field));
    }
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| DraftError::NotNumeric {
            field,
            value: text.to_string(),
        })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DraftError::Negative(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EntityRef;

    fn product() -> Product {
        Product {
            id: "p1".into(),
            name: "Rice".into(),
            description: Some("Long grain".into()),
            price: Some(Decimal::from(100)),
            shipping_charge: None,
            category: Some(EntityRef::Populated {
                id: "c1".into(),
                name: "Grain".into(),
            }),
            subcategory: Some(EntityRef::Id("s1".into())),
            image: None,
        }
    }

    #[test]
    fn test_from_product_defaults_shipping() {
        let draft = EditDraft::from_product(&product());
        assert_eq!(draft.price, "100");
        assert_eq!(draft.shipping_charge, "550");
        assert_eq!(draft.category(), "c1");
        assert_eq!(draft.subcategory(), "s1");
    }

    #[test]
    fn test_unchanged_draft_sends_default_shipping() {
        let update = EditDraft::from_product(&product()).to_update().unwrap();
        assert_eq!(update.shipping_charge, Decimal::from(550));
        assert_eq!(update.price, Decimal::from(100));
        assert_eq!(update.subcategory.as_deref(), Some("s1"));
    }

    #[test]
    fn test_missing_price_must_be_entered() {
        let mut p = product();
        p.price = None;
        let draft = EditDraft::from_product(&p);
        assert_eq!(draft.price, "");
        assert_eq!(
            draft.to_update(),
            Err(DraftError::Blank(DraftField::Price))
        );
    }

    #[test]
    fn test_non_numeric_rejected() {
        let mut draft = EditDraft::from_product(&product());
        draft.shipping_charge = "free".into();
        let err = draft.to_update().unwrap_err();
        assert_eq!(err.field(), DraftField::ShippingCharge);
        assert_eq!(err.to_string(), "Shipping charge must be a number, got 'free'");
    }

    #[test]
    fn test_negative_rejected() {
        let mut draft = EditDraft::from_product(&product());
        draft.price = "-1".into();
        assert_eq!(
            draft.to_update(),
            Err(DraftError::Negative(DraftField::Price))
        );
        draft.price = " 12.75 ".into();
        assert_eq!(
            draft.to_update().unwrap().price,
            Decimal::from_str("12.75").unwrap()
        );
    }

    #[test]
    fn test_validate_collects_all() {
        let mut draft = EditDraft::from_product(&product());
        draft.name = "  ".into();
        draft.price = "abc".into();
        draft.select_category("");
        let fields: Vec<DraftField> = draft.validate().iter().map(DraftError::field).collect();
        assert_eq!(
            fields,
            [DraftField::Name, DraftField::Price, DraftField::Category]
        );
    }

    #[test]
    fn test_select_category_clears_subcategory() {
        let mut draft = EditDraft::from_product(&product());
        assert!(!draft.select_category("c1"));
        assert_eq!(draft.subcategory(), "s1");

        assert!(draft.select_category("c2"));
        assert_eq!(draft.category(), "c2");
        assert_eq!(draft.subcategory(), "");

        let update = draft.to_update().unwrap();
        assert_eq!(update.subcategory, None);
    }
}
