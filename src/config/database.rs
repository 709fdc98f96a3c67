//! Database configuration module for the reference-data seeder.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Composite natural keys (`(country_id, language_id)` and
//! `(role_id, permission_id)`) get explicit unique indexes, which is what makes
//! re-running the bulk imports safe.

use crate::entities::{
    Country, CountryLanguage, Currency, Language, Permission, Region, Role, RolePermission,
    Timezone, country_language, role_permission,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Used when `DATABASE_URL` is not set. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/refdata.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the given database URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all reference tables and their natural-key indexes if they do not exist yet.
///
/// Parents are created before children. Safe to call on every run.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Region).await?;
    create_table(db, &schema, Language).await?;
    create_table(db, &schema, Currency).await?;
    create_table(db, &schema, Country).await?;
    create_table(db, &schema, Timezone).await?;
    create_table(db, &schema, Permission).await?;
    create_table(db, &schema, Role).await?;
    create_table(db, &schema, RolePermission).await?;
    create_table(db, &schema, CountryLanguage).await?;

    create_index(db, country_language_pair_index()).await?;
    create_index(db, role_permission_pair_index()).await?;

    info!("Reference tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, index: IndexCreateStatement) -> Result<()> {
    let builder = db.get_database_backend();
    db.execute(builder.build(&index)).await?;
    Ok(())
}

fn country_language_pair_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_country_languages_country_language")
        .table(CountryLanguage)
        .col(country_language::Column::CountryId)
        .col(country_language::Column::LanguageId)
        .unique()
        .if_not_exists()
        .to_owned()
}

fn role_permission_pair_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_role_permissions_role_permission")
        .table(RolePermission)
        .col(role_permission::Column::RoleId)
        .col(role_permission::Column::PermissionId)
        .unique()
        .if_not_exists()
        .to_owned()
}
