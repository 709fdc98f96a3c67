//! Seeder orchestration.
//!
//! Runs the selected seeders in dependency order (parents before children) and
//! collects their results into a [`RunReport`].

use crate::{
    config::fixtures::Fixtures,
    core::{
        access,
        batch::DEFAULT_BATCH_SIZE,
        country_language::{
            ImportOptions, ImportReport, import_country_languages, validate_import_batch_size,
        },
        reference,
        summary::SeedSummary,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The seeders, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeederKind {
    /// Geographic regions
    Regions,
    /// Languages
    Languages,
    /// Currencies
    Currencies,
    /// Countries; needs regions and currencies
    Countries,
    /// Timezones; needs countries
    Timezones,
    /// Permissions
    Permissions,
    /// Roles and their permission links; needs permissions
    Roles,
    /// Country/language associations; needs countries and languages
    CountryLanguages,
}

impl SeederKind {
    /// Every seeder in run order
    pub const ALL: [Self; 8] = [
        Self::Regions,
        Self::Languages,
        Self::Currencies,
        Self::Countries,
        Self::Timezones,
        Self::Permissions,
        Self::Roles,
        Self::CountryLanguages,
    ];

    /// Name used on the command line and in reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Regions => "regions",
            Self::Languages => "languages",
            Self::Currencies => "currencies",
            Self::Countries => "countries",
            Self::Timezones => "timezones",
            Self::Permissions => "permissions",
            Self::Roles => "roles",
            Self::CountryLanguages => "country-languages",
        }
    }
}

impl fmt::Display for SeederKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeederKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::UnknownSeeder {
                name: s.to_string(),
            })
    }
}

/// Settings for a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Rows per statement for the association import
    pub batch_size: usize,
    /// Clear existing associations before importing them
    pub fresh: bool,
    /// Restrict the run to these seeders; empty means all
    pub only: Vec<SeederKind>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fresh: false,
            only: Vec::new(),
        }
    }
}

impl RunOptions {
    /// Seeders selected by these options, in run order
    #[must_use]
    pub fn selected(&self) -> Vec<SeederKind> {
        SeederKind::ALL
            .into_iter()
            .filter(|kind| self.only.is_empty() || self.only.contains(kind))
            .collect()
    }
}

/// Result of one seeder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeederOutcome {
    /// An upsert-by-key seeder
    Upserted(SeedSummary),
    /// The association import
    Imported(ImportReport),
}

/// Results of a whole run, in run order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per seeder that ran
    pub steps: Vec<(SeederKind, SeederOutcome)>,
}

impl RunReport {
    /// Outcome of a given seeder, if it ran
    #[must_use]
    pub fn outcome(&self, kind: SeederKind) -> Option<&SeederOutcome> {
        self.steps
            .iter()
            .find(|(step, _)| *step == kind)
            .map(|(_, outcome)| outcome)
    }
}

/// Runs the selected seeders against `db`.
///
/// Any store error aborts the run; seeders that already finished keep their
/// writes.
pub async fn run(
    db: &DatabaseConnection,
    fixtures: &Fixtures,
    options: &RunOptions,
) -> Result<RunReport> {
    validate_import_batch_size(options.batch_size)?;

    let selected = options.selected();
    info!(
        "Running {} seeders: {}",
        selected.len(),
        selected.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(", ")
    );

    let mut report = RunReport::default();
    for kind in selected {
        let outcome = match kind {
            SeederKind::Regions => {
                SeederOutcome::Upserted(reference::seed_regions(db, &fixtures.regions).await?)
            }
            SeederKind::Languages => {
                SeederOutcome::Upserted(reference::seed_languages(db, &fixtures.languages).await?)
            }
            SeederKind::Currencies => SeederOutcome::Upserted(
                reference::seed_currencies(db, &fixtures.currencies).await?,
            ),
            SeederKind::Countries => {
                SeederOutcome::Upserted(reference::seed_countries(db, &fixtures.countries).await?)
            }
            SeederKind::Timezones => {
                SeederOutcome::Upserted(reference::seed_timezones(db, &fixtures.timezones).await?)
            }
            SeederKind::Permissions => SeederOutcome::Upserted(
                access::seed_permissions(db, &fixtures.permissions).await?,
            ),
            SeederKind::Roles => {
                SeederOutcome::Upserted(access::seed_roles(db, &fixtures.roles).await?)
            }
            SeederKind::CountryLanguages => {
                let import_options = ImportOptions {
                    batch_size: options.batch_size,
                    fresh: options.fresh,
                };
                SeederOutcome::Imported(
                    import_country_languages(db, &fixtures.country_languages, import_options)
                        .await?,
                )
            }
        };
        report.steps.push((kind, outcome));
    }

    Ok(report)
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seeding summary")?;
        for (kind, outcome) in &self.steps {
            match outcome {
                SeederOutcome::Upserted(counts) => writeln!(
                    f,
                    "  {:<18} inserted {:>4} | updated {:>4} | unchanged {:>4} | skipped {:>4}",
                    kind.name(),
                    counts.inserted,
                    counts.updated,
                    counts.unchanged,
                    counts.skipped
                )?,
                SeederOutcome::Imported(import) => writeln!(
                    f,
                    "  {:<18} created {:>5} of {} candidates | {} countries ({} skipped) | {} languages skipped | {} primaries moved | {} batches",
                    kind.name(),
                    import.rows_inserted,
                    import.candidates,
                    import.countries_processed,
                    import.countries_skipped,
                    import.languages_skipped,
                    import.primaries_updated,
                    import.batches_written
                )?,
            }
        }
        Ok(())
    }
}

/// Formats a run report as a plain-text table for the console.
#[must_use]
pub fn format_run_summary(report: &RunReport) -> String {
    report.to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::fixtures::parse_fixtures;
    use crate::entities::{Country, CountryLanguage, Language, country_language};
    use crate::test_utils::setup_test_db;
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    const SMALL_FIXTURES: &str = r#"
        [[regions]]
        code = "EU"
        name = "Europe"

        [[languages]]
        code = "fr"
        name = "French"
        native_name = "Français"

        [[languages]]
        code = "en"
        name = "English"
        native_name = "English"

        [[currencies]]
        code = "EUR"
        name = "Euro"
        symbol = "€"

        [[countries]]
        code = "FR"
        name = "France"
        region = "EU"
        currency = "EUR"

        [[timezones]]
        name = "Europe/Paris"
        utc_offset_minutes = 60
        country = "FR"

        [[permissions]]
        slug = "content.edit"
        description = "Edit content"

        [[roles]]
        slug = "editor"
        name = "Editor"
        description = "Edits content"
        permissions = ["content.edit"]

        [[country_languages]]
        country = "FR"
        languages = ["fr", "en"]

        [[country_languages]]
        country = "XX"
        languages = ["fr"]
    "#;

    #[test]
    fn test_seeder_kind_parsing() {
        assert_eq!(
            "country-languages".parse::<SeederKind>().unwrap(),
            SeederKind::CountryLanguages
        );
        assert_eq!(
            "Country_Languages".parse::<SeederKind>().unwrap(),
            SeederKind::CountryLanguages
        );
        assert_eq!("roles".parse::<SeederKind>().unwrap(), SeederKind::Roles);
        assert!(matches!(
            "users".parse::<SeederKind>(),
            Err(Error::UnknownSeeder { .. })
        ));
    }

    #[test]
    fn test_selected_keeps_dependency_order() {
        let options = RunOptions {
            only: vec![SeederKind::CountryLanguages, SeederKind::Languages],
            ..RunOptions::default()
        };
        assert_eq!(
            options.selected(),
            vec![SeederKind::Languages, SeederKind::CountryLanguages]
        );
        assert_eq!(RunOptions::default().selected().len(), SeederKind::ALL.len());
    }

    #[tokio::test]
    async fn test_full_run_then_rerun() -> Result<()> {
        let db = setup_test_db().await?;
        let fixtures = parse_fixtures(SMALL_FIXTURES)?;

        let report = run(&db, &fixtures, &RunOptions::default()).await?;
        assert_eq!(report.steps.len(), SeederKind::ALL.len());
        let Some(SeederOutcome::Imported(import)) = report.outcome(SeederKind::CountryLanguages)
        else {
            panic!("country languages did not run");
        };
        assert_eq!(import.rows_inserted, 2);
        assert_eq!(import.countries_skipped, 1);

        let fr_lang = Language::find()
            .filter(crate::entities::language::Column::Code.eq("fr"))
            .one(&db)
            .await?
            .unwrap();
        let primary = CountryLanguage::find()
            .filter(country_language::Column::IsPrimary.eq(true))
            .all(&db)
            .await?;
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].language_id, fr_lang.id);

        let rerun = run(&db, &fixtures, &RunOptions::default()).await?;
        for (kind, outcome) in &rerun.steps {
            match outcome {
                SeederOutcome::Upserted(counts) => {
                    assert_eq!(counts.inserted + counts.updated, 0, "{kind} changed on rerun");
                }
                SeederOutcome::Imported(import) => assert_eq!(import.rows_inserted, 0),
            }
        }
        assert_eq!(CountryLanguage::find().count(&db).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_only_runs_selected_seeders() -> Result<()> {
        let db = setup_test_db().await?;
        let fixtures = parse_fixtures(SMALL_FIXTURES)?;
        let options = RunOptions {
            only: vec![SeederKind::Languages],
            ..RunOptions::default()
        };

        let report = run(&db, &fixtures, &options).await?;
        assert_eq!(report.steps.len(), 1);
        assert_eq!(Language::find().count(&db).await?, 2);
        assert_eq!(Country::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_batch_size_fails_before_any_seeder() -> Result<()> {
        let db = setup_test_db().await?;
        let fixtures = parse_fixtures(SMALL_FIXTURES)?;
        let options = RunOptions {
            batch_size: 0,
            ..RunOptions::default()
        };

        let result = run(&db, &fixtures, &options).await;
        assert!(matches!(result, Err(Error::InvalidBatchSize { size: 0, .. })));
        assert_eq!(Language::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_embedded_dataset_seeds_cleanly() -> Result<()> {
        let db = setup_test_db().await?;
        let fixtures = Fixtures::embedded()?;

        let report = run(&db, &fixtures, &RunOptions::default()).await?;
        let Some(SeederOutcome::Imported(import)) = report.outcome(SeederKind::CountryLanguages)
        else {
            panic!("country languages did not run");
        };
        assert_eq!(import.countries_skipped, 0);
        assert_eq!(import.languages_skipped, 0);
        assert_eq!(import.countries_processed, fixtures.country_languages.len());

        let primaries = CountryLanguage::find()
            .filter(country_language::Column::IsPrimary.eq(true))
            .count(&db)
            .await?;
        assert_eq!(primaries, u64::try_from(fixtures.country_languages.len()).unwrap());

        Ok(())
    }

    #[test]
    fn test_format_run_summary() {
        let report = RunReport {
            steps: vec![
                (
                    SeederKind::Languages,
                    SeederOutcome::Upserted(SeedSummary {
                        inserted: 3,
                        ..SeedSummary::default()
                    }),
                ),
                (
                    SeederKind::CountryLanguages,
                    SeederOutcome::Imported(ImportReport {
                        candidates: 3,
                        rows_built: 2,
                        rows_inserted: 2,
                        countries_processed: 1,
                        countries_skipped: 1,
                        languages_skipped: 0,
                        batches_written: 1,
                        rows_cleared: 0,
                        primaries_updated: 0,
                    }),
                ),
            ],
        };

        let text = format_run_summary(&report);
        assert!(text.starts_with("Seeding summary\n"));
        assert!(text.contains("languages"));
        assert!(text.contains("inserted    3"));
        assert!(text.contains("created     2 of 3 candidates"));
        assert!(text.contains("1 countries (1 skipped)"));
        assert!(text.contains("0 primaries moved"));
        assert_eq!(text.lines().count(), 3);
    }
}
