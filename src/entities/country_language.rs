//! Country/language association entity.
//!
//! One row per `(country_id, language_id)` pair. Exactly one row per country
//! carries `is_primary = true`: the first language listed for that country in
//! the fixture data. Rows are written in bulk by the association import and
//! never updated individually afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Country/language association database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "country_languages")]
pub struct Model {
    /// Unique identifier for the association
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Country the language is spoken in
    pub country_id: i64,
    /// Language spoken
    pub language_id: i64,
    /// Whether this is the country's highest-priority language
    pub is_primary: bool,
    /// Always true at creation
    pub is_active: bool,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between `CountryLanguage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each association belongs to one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
    /// Each association belongs to one language
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LanguageId",
        to = "super::language::Column::Id"
    )]
    Language,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Language.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
