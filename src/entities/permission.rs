//! Permission entity - Named capabilities granted to roles.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    /// Unique identifier for the permission
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Natural key (e.g., `"content.publish"`)
    #[sea_orm(unique)]
    pub slug: String,
    /// What the permission allows
    pub description: String,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Permission and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One permission is granted through many role links
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermissions,
}

impl Related<super::role_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
