//! Region entity - Geographic grouping for countries (e.g., "Europe", "Middle East").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Region database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "regions")]
pub struct Model {
    /// Unique identifier for the region
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key (e.g., `"EU"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Region and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One region groups many countries
    #[sea_orm(has_many = "super::country::Entity")]
    Countries,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
