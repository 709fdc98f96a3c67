//! Upsert-by-key seeders for the geographic reference tables.
//!
//! Every record is looked up by its natural key. A missing row is inserted, a
//! row with different attributes is overwritten and an identical row is left
//! alone, so running a seeder twice changes nothing the second time. Each
//! seeder runs in a single transaction.

use crate::{
    config::fixtures::{
        CountryFixture, CurrencyFixture, LanguageFixture, RegionFixture, TimezoneFixture,
    },
    core::{
        lookup::{self, IdLookup},
        summary::{SeedSummary, UpsertOutcome},
    },
    entities::{
        Country, Currency, Language, Region, Timezone, country, currency, language, region,
        timezone,
    },
    errors::Result,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Inserts or updates one region by code.
pub async fn upsert_region<C>(
    db: &C,
    fixture: &RegionFixture,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Region::find()
        .filter(region::Column::Code.eq(fixture.code.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row) if row.name == fixture.name => Ok(UpsertOutcome::Unchanged),
        Some(row) => {
            let mut active_model: region::ActiveModel = row.into();
            active_model.name = Set(fixture.name.clone());
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            region::ActiveModel {
                code: Set(fixture.code.clone()),
                name: Set(fixture.name.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Inserts or updates one language by code.
pub async fn upsert_language<C>(
    db: &C,
    fixture: &LanguageFixture,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Language::find()
        .filter(language::Column::Code.eq(fixture.code.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row)
            if row.name == fixture.name
                && row.native_name == fixture.native_name
                && row.is_rtl == fixture.is_rtl
                && row.is_active == fixture.is_active =>
        {
            Ok(UpsertOutcome::Unchanged)
        }
        Some(row) => {
            let mut active_model: language::ActiveModel = row.into();
            active_model.name = Set(fixture.name.clone());
            active_model.native_name = Set(fixture.native_name.clone());
            active_model.is_rtl = Set(fixture.is_rtl);
            active_model.is_active = Set(fixture.is_active);
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            language::ActiveModel {
                code: Set(fixture.code.clone()),
                name: Set(fixture.name.clone()),
                native_name: Set(fixture.native_name.clone()),
                is_rtl: Set(fixture.is_rtl),
                is_active: Set(fixture.is_active),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Inserts or updates one currency by code.
pub async fn upsert_currency<C>(
    db: &C,
    fixture: &CurrencyFixture,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Currency::find()
        .filter(currency::Column::Code.eq(fixture.code.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row)
            if row.name == fixture.name
                && row.symbol == fixture.symbol
                && row.decimal_places == fixture.decimal_places =>
        {
            Ok(UpsertOutcome::Unchanged)
        }
        Some(row) => {
            let mut active_model: currency::ActiveModel = row.into();
            active_model.name = Set(fixture.name.clone());
            active_model.symbol = Set(fixture.symbol.clone());
            active_model.decimal_places = Set(fixture.decimal_places);
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            currency::ActiveModel {
                code: Set(fixture.code.clone()),
                name: Set(fixture.name.clone()),
                symbol: Set(fixture.symbol.clone()),
                decimal_places: Set(fixture.decimal_places),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Parent ids already resolved for a country
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountryParents {
    /// Resolved region, if any
    pub region_id: Option<i64>,
    /// Resolved currency, if any
    pub currency_id: Option<i64>,
}

/// Inserts or updates one country by code.
pub async fn upsert_country<C>(
    db: &C,
    fixture: &CountryFixture,
    parents: CountryParents,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Country::find()
        .filter(country::Column::Code.eq(fixture.code.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row)
            if row.name == fixture.name
                && row.phone_prefix == fixture.phone_prefix
                && row.region_id == parents.region_id
                && row.currency_id == parents.currency_id
                && row.is_active == fixture.is_active =>
        {
            Ok(UpsertOutcome::Unchanged)
        }
        Some(row) => {
            let mut active_model: country::ActiveModel = row.into();
            active_model.name = Set(fixture.name.clone());
            active_model.phone_prefix = Set(fixture.phone_prefix.clone());
            active_model.region_id = Set(parents.region_id);
            active_model.currency_id = Set(parents.currency_id);
            active_model.is_active = Set(fixture.is_active);
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            country::ActiveModel {
                code: Set(fixture.code.clone()),
                name: Set(fixture.name.clone()),
                phone_prefix: Set(fixture.phone_prefix.clone()),
                region_id: Set(parents.region_id),
                currency_id: Set(parents.currency_id),
                is_active: Set(fixture.is_active),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Inserts or updates one timezone by name.
pub async fn upsert_timezone<C>(
    db: &C,
    fixture: &TimezoneFixture,
    country_id: Option<i64>,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Timezone::find()
        .filter(timezone::Column::Name.eq(fixture.name.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row)
            if row.utc_offset_minutes == fixture.utc_offset_minutes
                && row.country_id == country_id =>
        {
            Ok(UpsertOutcome::Unchanged)
        }
        Some(row) => {
            let mut active_model: timezone::ActiveModel = row.into();
            active_model.utc_offset_minutes = Set(fixture.utc_offset_minutes);
            active_model.country_id = Set(country_id);
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            timezone::ActiveModel {
                name: Set(fixture.name.clone()),
                utc_offset_minutes: Set(fixture.utc_offset_minutes),
                country_id: Set(country_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Resolves an optional parent code. An unknown code is logged, counted as
/// skipped and stored as `NULL`.
fn resolve_parent(
    ids: &IdLookup,
    code: Option<&str>,
    kind: &str,
    owner: &str,
    summary: &mut SeedSummary,
) -> Option<i64> {
    let code = code?;
    let id = ids.get(code).copied();
    if id.is_none() {
        warn!("{} '{}' referenced by '{}' not found, leaving it unset", kind, code, owner);
        summary.skipped += 1;
    }
    id
}

/// Seeds regions.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_regions(
    db: &DatabaseConnection,
    fixtures: &[RegionFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    for fixture in fixtures {
        let outcome = upsert_region(&txn, fixture, now).await?;
        debug!("Region '{}': {:?}", fixture.code, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Regions seeded: {:?}", summary);
    Ok(summary)
}

/// Seeds languages.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_languages(
    db: &DatabaseConnection,
    fixtures: &[LanguageFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    for fixture in fixtures {
        let outcome = upsert_language(&txn, fixture, now).await?;
        debug!("Language '{}': {:?}", fixture.code, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Languages seeded: {:?}", summary);
    Ok(summary)
}

/// Seeds currencies.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_currencies(
    db: &DatabaseConnection,
    fixtures: &[CurrencyFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    for fixture in fixtures {
        let outcome = upsert_currency(&txn, fixture, now).await?;
        debug!("Currency '{}': {:?}", fixture.code, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Currencies seeded: {:?}", summary);
    Ok(summary)
}

/// Seeds countries, resolving region and currency by code.
///
/// Run after regions and currencies; parents seeded later are not picked up.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_countries(
    db: &DatabaseConnection,
    fixtures: &[CountryFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    let regions = lookup::region_ids(&txn).await?;
    let currencies = lookup::currency_ids(&txn).await?;

    for fixture in fixtures {
        let parents = CountryParents {
            region_id: resolve_parent(
                &regions,
                fixture.region.as_deref(),
                "Region",
                &fixture.code,
                &mut summary,
            ),
            currency_id: resolve_parent(
                &currencies,
                fixture.currency.as_deref(),
                "Currency",
                &fixture.code,
                &mut summary,
            ),
        };
        let outcome = upsert_country(&txn, fixture, parents, now).await?;
        debug!("Country '{}': {:?}", fixture.code, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Countries seeded: {:?}", summary);
    Ok(summary)
}

/// Seeds timezones, resolving the country by code.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_timezones(
    db: &DatabaseConnection,
    fixtures: &[TimezoneFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    let countries = lookup::country_ids(&txn).await?;

    for fixture in fixtures {
        let country_id = resolve_parent(
            &countries,
            fixture.country.as_deref(),
            "Country",
            &fixture.name,
            &mut summary,
        );
        let outcome = upsert_timezone(&txn, fixture, country_id, now).await?;
        debug!("Timezone '{}': {:?}", fixture.name, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Timezones seeded: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    fn region_fixture(code: &str, name: &str) -> RegionFixture {
        RegionFixture {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn country_fixture(
        code: &str,
        region: Option<&str>,
        currency: Option<&str>,
    ) -> CountryFixture {
        CountryFixture {
            code: code.to_string(),
            name: format!("Country {code}"),
            phone_prefix: None,
            region: region.map(str::to_string),
            currency: currency.map(str::to_string),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_seed_regions_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let fixtures = vec![region_fixture("EU", "Europe"), region_fixture("AF", "Africa")];

        let first = seed_regions(&db, &fixtures).await?;
        assert_eq!(first.inserted, 2);

        let second = seed_regions(&db, &fixtures).await?;
        assert_eq!(second.inserted, 0);
        assert_eq!(second.unchanged, 2);
        assert_eq!(Region::find().count(&db).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_changed_attribute_updates_only_that_record() -> Result<()> {
        let db = setup_test_db().await?;
        seed_regions(
            &db,
            &[region_fixture("EU", "Europe"), region_fixture("AF", "Africa")],
        )
        .await?;

        let fixtures = vec![
            region_fixture("EU", "European Union"),
            region_fixture("AF", "Africa"),
        ];
        let summary = seed_regions(&db, &fixtures).await?;
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);

        let eu = Region::find()
            .filter(region::Column::Code.eq("EU"))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(eu.name, "European Union");
        assert!(eu.updated_at >= eu.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_language_update_covers_every_attribute() -> Result<()> {
        let db = setup_test_db().await?;
        let mut arabic = LanguageFixture {
            code: "ar".to_string(),
            name: "Arabic".to_string(),
            native_name: "العربية".to_string(),
            is_rtl: false,
            is_active: true,
        };
        seed_languages(&db, std::slice::from_ref(&arabic)).await?;

        arabic.is_rtl = true;
        let summary = seed_languages(&db, std::slice::from_ref(&arabic)).await?;
        assert_eq!(summary.updated, 1);

        let stored = Language::find().one(&db).await?.unwrap();
        assert!(stored.is_rtl);

        Ok(())
    }

    #[tokio::test]
    async fn test_countries_resolve_parents_by_code() -> Result<()> {
        let db = setup_test_db().await?;
        seed_regions(&db, &[region_fixture("EU", "Europe")]).await?;
        seed_currencies(
            &db,
            &[CurrencyFixture {
                code: "EUR".to_string(),
                name: "Euro".to_string(),
                symbol: "€".to_string(),
                decimal_places: 2,
            }],
        )
        .await?;

        let summary = seed_countries(
            &db,
            &[
                country_fixture("FR", Some("EU"), Some("EUR")),
                country_fixture("ZZ", Some("XX"), None),
            ],
        )
        .await?;
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 1);

        let eu = Region::find().one(&db).await?.unwrap();
        let eur = Currency::find().one(&db).await?.unwrap();
        let fr = Country::find()
            .filter(country::Column::Code.eq("FR"))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(fr.region_id, Some(eu.id));
        assert_eq!(fr.currency_id, Some(eur.id));

        let zz = Country::find()
            .filter(country::Column::Code.eq("ZZ"))
            .one(&db)
            .await?
            .unwrap();
        assert!(zz.region_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_timezones_link_to_country() -> Result<()> {
        let db = setup_test_db().await?;
        seed_countries(&db, &[country_fixture("FR", None, None)]).await?;

        let fixtures = vec![
            TimezoneFixture {
                name: "Europe/Paris".to_string(),
                utc_offset_minutes: 60,
                country: Some("FR".to_string()),
            },
            TimezoneFixture {
                name: "Etc/UTC".to_string(),
                utc_offset_minutes: 0,
                country: None,
            },
        ];
        let summary = seed_timezones(&db, &fixtures).await?;
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 0);

        let fr = Country::find().one(&db).await?.unwrap();
        let paris = Timezone::find()
            .filter(timezone::Column::Name.eq("Europe/Paris"))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(paris.country_id, Some(fr.id));

        let again = seed_timezones(&db, &fixtures).await?;
        assert_eq!(again.unchanged, 2);

        Ok(())
    }
}
