//! Timezone entity - IANA timezones with their standard UTC offset.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Timezone database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timezones")]
pub struct Model {
    /// Unique identifier for the timezone
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key, IANA name (e.g., `"Europe/Paris"`)
    #[sea_orm(unique)]
    pub name: String,
    /// Standard (non-DST) offset from UTC in minutes
    pub utc_offset_minutes: i32,
    /// Country this zone is primarily used in
    pub country_id: Option<i64>,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Timezone and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each timezone optionally belongs to one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
