//! Country entity - Countries the platform serves.
//!
//! Countries are keyed by their uppercase ISO 3166-1 alpha-2 code. The region
//! and currency references are optional: a fixture may name a parent that was
//! never seeded, in which case the column stays `NULL`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Country database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    /// Unique identifier for the country
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key, ISO 3166-1 alpha-2 (e.g., `"FR"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// International dialing prefix (e.g., "+33")
    pub phone_prefix: Option<String>,
    /// Region this country belongs to
    pub region_id: Option<i64>,
    /// Official currency
    pub currency_id: Option<i64>,
    /// Inactive countries are kept but hidden from the platform
    pub is_active: bool,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Country and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each country optionally belongs to one region
    #[sea_orm(
        belongs_to = "super::region::Entity",
        from = "Column::RegionId",
        to = "super::region::Column::Id"
    )]
    Region,
    /// Each country optionally uses one currency
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    /// One country has many language associations
    #[sea_orm(has_many = "super::country_language::Entity")]
    CountryLanguages,
    /// One country spans one or more timezones
    #[sea_orm(has_many = "super::timezone::Entity")]
    Timezones,
}

impl Related<super::region::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::country_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CountryLanguages.def()
    }
}

impl Related<super::timezone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timezones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
