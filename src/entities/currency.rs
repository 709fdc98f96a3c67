//! Currency entity - ISO 4217 currencies.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    /// Unique identifier for the currency
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key, ISO 4217 (e.g., `"EUR"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Display symbol (e.g., "€")
    pub symbol: String,
    /// Number of minor-unit digits
    pub decimal_places: i32,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Currency and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One currency is used by many countries
    #[sea_orm(has_many = "super::country::Entity")]
    Countries,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
