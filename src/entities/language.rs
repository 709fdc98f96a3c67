//! Language entity - Languages the platform can publish content in.
//!
//! Languages are keyed by their lowercase ISO 639-1 code and are referenced by
//! country associations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Language database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    /// Unique identifier for the language
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key, ISO 639-1 (e.g., `"fr"`)
    #[sea_orm(unique)]
    pub code: String,
    /// English name (e.g., "French")
    pub name: String,
    /// Name in the language itself (e.g., "Français")
    pub native_name: String,
    /// Whether the script is written right-to-left
    pub is_rtl: bool,
    /// Inactive languages are kept for history but hidden from the platform
    pub is_active: bool,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Language and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One language is spoken in many countries
    #[sea_orm(has_many = "super::country_language::Entity")]
    CountryLanguages,
}

impl Related<super::country_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CountryLanguages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
