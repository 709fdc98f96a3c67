//! Country/language association import.
//!
//! The import is split in two:
//! - [`build_association_rows`] is pure. Given the mapping and the two
//!   `code → id` lookups it decides which rows exist and which one is primary.
//! - [`import_country_languages`] fetches the lookups, writes the rows in
//!   batches and reports what happened.
//!
//! Unknown country or language codes never fail the import; they are skipped
//! and counted. Re-running the import is safe: the `(country_id, language_id)`
//! unique index plus `ON CONFLICT DO NOTHING` keeps existing pairs, and before
//! inserting, the primary flags of already stored rows are moved to the
//! language now listed first, so a country never holds two primary rows.

use crate::{
    config::fixtures::CountryLanguagesFixture,
    core::{
        batch::{DEFAULT_BATCH_SIZE, columns_per_row, insert_in_batches, validate_batch_size},
        lookup::{self, IdLookup},
    },
    entities::{CountryLanguage, country_language},
    errors::Result,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// One association row ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRow {
    /// Resolved country id
    pub country_id: i64,
    /// Resolved language id
    pub language_id: i64,
    /// First resolved language of the country
    pub is_primary: bool,
    /// Always true at creation
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Same as `created_at` at creation
    pub updated_at: NaiveDateTime,
}

impl AssociationRow {
    fn into_active_model(self) -> country_language::ActiveModel {
        country_language::ActiveModel {
            country_id: Set(self.country_id),
            language_id: Set(self.language_id),
            is_primary: Set(self.is_primary),
            is_active: Set(self.is_active),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
            ..Default::default()
        }
    }
}

/// Rows built from a mapping, plus what was left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationPlan {
    /// Rows in mapping order
    pub rows: Vec<AssociationRow>,
    /// Sum of the language list lengths in the mapping
    pub candidates: usize,
    /// Countries that resolved and were processed
    pub countries_processed: usize,
    /// Country codes with no persisted country, in mapping order
    pub skipped_countries: Vec<String>,
    /// Language entries with no persisted language
    pub skipped_languages: usize,
    /// Country entries or language entries that repeat an earlier one
    pub duplicates: usize,
}

/// Builds association rows from an ordered country → languages mapping.
///
/// A country whose code is not in `countries` produces no rows. A language
/// code not in `languages` is skipped and the rest of the list continues. The
/// first language that resolves for a country is its primary language; when
/// the first listed code resolves that is simply index 0.
#[must_use]
pub fn build_association_rows(
    mapping: &[CountryLanguagesFixture],
    countries: &IdLookup,
    languages: &IdLookup,
    now: NaiveDateTime,
) -> AssociationPlan {
    let mut plan = AssociationPlan::default();
    let mut seen_countries = HashSet::new();

    for entry in mapping {
        plan.candidates += entry.languages.len();

        let Some(&country_id) = countries.get(&entry.country) else {
            warn!("Country '{}' not found, skipping its languages", entry.country);
            plan.skipped_countries.push(entry.country.clone());
            continue;
        };
        if !seen_countries.insert(country_id) {
            warn!("Country '{}' listed more than once, keeping the first list", entry.country);
            plan.duplicates += 1;
            continue;
        }
        plan.countries_processed += 1;

        let mut seen_languages = HashSet::new();
        for code in &entry.languages {
            let Some(&language_id) = languages.get(code) else {
                debug!("Language '{}' for country '{}' not found, skipping", code, entry.country);
                plan.skipped_languages += 1;
                continue;
            };
            if !seen_languages.insert(language_id) {
                plan.duplicates += 1;
                continue;
            }

            plan.rows.push(AssociationRow {
                country_id,
                language_id,
                is_primary: seen_languages.len() == 1,
                is_active: true,
                created_at: now,
                updated_at: now,
            });
        }
    }

    plan
}

/// Settings for one association import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Rows per `INSERT` statement
    pub batch_size: usize,
    /// Delete every existing association before importing
    pub fresh: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fresh: false,
        }
    }
}

/// What an association import did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Sum of the language list lengths in the mapping
    pub candidates: usize,
    /// Rows built after resolving references
    pub rows_built: usize,
    /// Rows actually persisted; pairs that already existed are not counted
    pub rows_inserted: u64,
    /// Countries that resolved
    pub countries_processed: usize,
    /// Country codes that did not resolve
    pub countries_skipped: usize,
    /// Language entries that did not resolve
    pub languages_skipped: usize,
    /// `INSERT` statements issued
    pub batches_written: usize,
    /// Rows deleted up front by a fresh import
    pub rows_cleared: u64,
    /// Stored rows whose primary flag was moved to the newly listed primary
    pub primaries_updated: u64,
}

/// Rejects a batch size the association import cannot write in one statement.
pub fn validate_import_batch_size(batch_size: usize) -> Result<()> {
    validate_batch_size(batch_size, columns_per_row::<CountryLanguage>())
}

/// Imports country/language associations from an ordered mapping.
///
/// Store errors propagate unchanged. Batches written before a failing batch
/// are not rolled back.
#[instrument(skip(db, mapping), fields(countries = mapping.len()))]
pub async fn import_country_languages<C>(
    db: &C,
    mapping: &[CountryLanguagesFixture],
    options: ImportOptions,
) -> Result<ImportReport>
where
    C: ConnectionTrait,
{
    validate_import_batch_size(options.batch_size)?;

    let languages = lookup::language_ids(db).await?;
    let codes: Vec<&str> = mapping.iter().map(|entry| entry.country.as_str()).collect();
    let countries = lookup::country_ids_for(db, &codes).await?;
    info!(
        "Importing country languages: {} countries in mapping, {} languages known",
        mapping.len(),
        languages.len()
    );

    let now = Utc::now().naive_utc();
    let plan = build_association_rows(mapping, &countries, &languages, now);

    let rows_cleared = if options.fresh {
        let deleted = CountryLanguage::delete_many().exec(db).await?.rows_affected;
        info!("Cleared {} existing country languages", deleted);
        deleted
    } else {
        0
    };

    let primaries_updated = if options.fresh {
        0
    } else {
        let primaries: Vec<(i64, i64)> = plan
            .rows
            .iter()
            .filter(|row| row.is_primary)
            .map(|row| (row.country_id, row.language_id))
            .collect();
        move_primaries(db, &primaries, now).await?
    };

    let rows_built = plan.rows.len();
    let models = plan
        .rows
        .into_iter()
        .map(AssociationRow::into_active_model)
        .collect();
    let outcome = insert_in_batches(db, models, options.batch_size, Some(pair_conflict())).await?;

    let report = ImportReport {
        candidates: plan.candidates,
        rows_built,
        rows_inserted: outcome.rows_inserted,
        countries_processed: plan.countries_processed,
        countries_skipped: plan.skipped_countries.len(),
        languages_skipped: plan.skipped_languages,
        batches_written: outcome.batches_written,
        rows_cleared,
        primaries_updated,
    };
    info!(
        "Country languages imported: {} created from {} candidates across {} countries in {} batches",
        report.rows_inserted, report.candidates, report.countries_processed, report.batches_written
    );
    Ok(report)
}

/// Clears the primary flag on stored rows that are no longer their country's
/// primary, then sets it on the stored row of the planned primary, if any.
/// Rows for the new primary that do not exist yet are inserted as primary later.
async fn move_primaries<C>(db: &C, primaries: &[(i64, i64)], now: NaiveDateTime) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut changed = 0;
    for &(country_id, language_id) in primaries {
        let demoted = CountryLanguage::update_many()
            .col_expr(country_language::Column::IsPrimary, Expr::value(false))
            .col_expr(country_language::Column::UpdatedAt, Expr::value(now))
            .filter(country_language::Column::CountryId.eq(country_id))
            .filter(country_language::Column::LanguageId.ne(language_id))
            .filter(country_language::Column::IsPrimary.eq(true))
            .exec(db)
            .await?
            .rows_affected;
        let promoted = CountryLanguage::update_many()
            .col_expr(country_language::Column::IsPrimary, Expr::value(true))
            .col_expr(country_language::Column::UpdatedAt, Expr::value(now))
            .filter(country_language::Column::CountryId.eq(country_id))
            .filter(country_language::Column::LanguageId.eq(language_id))
            .filter(country_language::Column::IsPrimary.eq(false))
            .exec(db)
            .await?
            .rows_affected;
        if demoted + promoted > 0 {
            debug!(
                "Country {} primary moved to language {} ({} demoted, {} promoted)",
                country_id, language_id, demoted, promoted
            );
        }
        changed += demoted + promoted;
    }
    Ok(changed)
}

fn pair_conflict() -> OnConflict {
    OnConflict::columns([
        country_language::Column::CountryId,
        country_language::Column::LanguageId,
    ])
    .do_nothing()
    .to_owned()
}
