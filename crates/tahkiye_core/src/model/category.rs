//! Category domain model.

use serde::{Deserialize, Serialize};

/// Storage identifier of a category.
pub type CategoryId = i64;

/// Persisted category ("Tarih", "Edebiyat", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}
