//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! inserting parent rows with sensible defaults.

use crate::{
    entities::{country, language},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a language with the given code.
///
/// # Defaults
/// * `name` / `native_name`: the code, uppercased
/// * `is_rtl`: false
/// * `is_active`: true
pub async fn insert_test_language(db: &DatabaseConnection, code: &str) -> Result<language::Model> {
    let now = Utc::now().naive_utc();
    language::ActiveModel {
        code: Set(code.to_string()),
        name: Set(code.to_uppercase()),
        native_name: Set(code.to_uppercase()),
        is_rtl: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts an active country with the given code and no region or currency.
pub async fn insert_test_country(db: &DatabaseConnection, code: &str) -> Result<country::Model> {
    let now = Utc::now().naive_utc();
    country::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Country {code}")),
        phone_prefix: Set(None),
        region_id: Set(None),
        currency_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
