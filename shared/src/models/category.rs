//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Subcategory entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Owning category, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRef>,
}

impl Subcategory {
    /// Whether this subcategory is known to belong to another category.
    ///
    /// Subcategories without an owner reference are assumed to belong to
    /// whatever category they were fetched for.
    pub fn belongs_elsewhere(&self, category_id: &str) -> bool {
        self.category
            .as_ref()
            .is_some_and(|owner| owner.id() != category_id)
    }
}

/// Reference from one record to another
///
/// The server returns either the populated record (`{"_id", "name"}`) or
/// just its id, depending on whether the relation was joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
    Id(String),
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Populated { id, .. } => id,
            EntityRef::Id(id) => id,
        }
    }

    /// Display name, `None` for bare ids or blank names
    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Populated { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}
