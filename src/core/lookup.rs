//! Natural-key lookups.
//!
//! Each function loads `natural key → id` pairs for one table into a map held
//! in memory for the duration of a seeder, so child rows can resolve their
//! parents without a query per reference.

use crate::{
    entities::{
        Country, Currency, Language, Permission, Region, country, currency, language, permission,
        region,
    },
    errors::Result,
};
use sea_orm::{QuerySelect, prelude::*};
use std::collections::HashMap;

/// Maps natural keys to surrogate ids
pub type IdLookup = HashMap<String, i64>;

/// Loads every language as `code → id`.
pub async fn language_ids<C>(db: &C) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    let pairs: Vec<(String, i64)> = Language::find()
        .select_only()
        .column(language::Column::Code)
        .column(language::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Loads every country as `code → id`.
pub async fn country_ids<C>(db: &C) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    let pairs: Vec<(String, i64)> = Country::find()
        .select_only()
        .column(country::Column::Code)
        .column(country::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Loads only the countries whose code is in `codes`, by exact match.
pub async fn country_ids_for<C>(db: &C, codes: &[&str]) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    if codes.is_empty() {
        return Ok(IdLookup::new());
    }
    let pairs: Vec<(String, i64)> = Country::find()
        .select_only()
        .column(country::Column::Code)
        .column(country::Column::Id)
        .filter(country::Column::Code.is_in(codes.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Loads every region as `code → id`.
pub async fn region_ids<C>(db: &C) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    let pairs: Vec<(String, i64)> = Region::find()
        .select_only()
        .column(region::Column::Code)
        .column(region::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Loads every currency as `code → id`.
pub async fn currency_ids<C>(db: &C) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    let pairs: Vec<(String, i64)> = Currency::find()
        .select_only()
        .column(currency::Column::Code)
        .column(currency::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Loads every permission as `slug → id`.
pub async fn permission_ids<C>(db: &C) -> Result<IdLookup>
where
    C: ConnectionTrait,
{
    let pairs: Vec<(String, i64)> = Permission::find()
        .select_only()
        .column(permission::Column::Slug)
        .column(permission::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}
