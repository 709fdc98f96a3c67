//! Fixture loading from TOML.
//!
//! The reference dataset ships inside the binary (`fixtures/reference.toml`)
//! and can be replaced by a file on disk. Table order in the file does not
//! matter; list order inside `country_languages` does, since the first
//! language of each country becomes its primary language.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const EMBEDDED_FIXTURES: &str = include_str!("../../fixtures/reference.toml");

/// The entire fixture file
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    /// Geographic regions
    #[serde(default)]
    pub regions: Vec<RegionFixture>,
    /// Languages, keyed by ISO 639-1 code
    #[serde(default)]
    pub languages: Vec<LanguageFixture>,
    /// Currencies, keyed by ISO 4217 code
    #[serde(default)]
    pub currencies: Vec<CurrencyFixture>,
    /// Countries, keyed by ISO 3166-1 alpha-2 code
    #[serde(default)]
    pub countries: Vec<CountryFixture>,
    /// Timezones, keyed by IANA name
    #[serde(default)]
    pub timezones: Vec<TimezoneFixture>,
    /// Permissions, keyed by slug
    #[serde(default)]
    pub permissions: Vec<PermissionFixture>,
    /// Roles, keyed by slug
    #[serde(default)]
    pub roles: Vec<RoleFixture>,
    /// Ordered language lists per country
    #[serde(default)]
    pub country_languages: Vec<CountryLanguagesFixture>,
}

/// A region record
#[derive(Debug, Deserialize, Clone)]
pub struct RegionFixture {
    /// Natural key
    pub code: String,
    /// Display name
    pub name: String,
}

/// A language record
#[derive(Debug, Deserialize, Clone)]
pub struct LanguageFixture {
    /// Natural key (ISO 639-1)
    pub code: String,
    /// English name
    pub name: String,
    /// Name in the language itself
    pub native_name: String,
    /// Right-to-left script
    #[serde(default)]
    pub is_rtl: bool,
    /// Defaults to active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A currency record
#[derive(Debug, Deserialize, Clone)]
pub struct CurrencyFixture {
    /// Natural key (ISO 4217)
    pub code: String,
    /// Display name
    pub name: String,
    /// Display symbol
    pub symbol: String,
    /// Minor-unit digits
    #[serde(default = "default_decimal_places")]
    pub decimal_places: i32,
}

/// A country record. `region` and `currency` are natural keys of their parents.
#[derive(Debug, Deserialize, Clone)]
pub struct CountryFixture {
    /// Natural key (ISO 3166-1 alpha-2)
    pub code: String,
    /// Display name
    pub name: String,
    /// Dialing prefix
    #[serde(default)]
    pub phone_prefix: Option<String>,
    /// Region code
    #[serde(default)]
    pub region: Option<String>,
    /// Currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Defaults to active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A timezone record. `country` is the natural key of the country.
#[derive(Debug, Deserialize, Clone)]
pub struct TimezoneFixture {
    /// Natural key (IANA name)
    pub name: String,
    /// Standard offset from UTC in minutes
    pub utc_offset_minutes: i32,
    /// Country code
    #[serde(default)]
    pub country: Option<String>,
}

/// A permission record
#[derive(Debug, Deserialize, Clone)]
pub struct PermissionFixture {
    /// Natural key
    pub slug: String,
    /// What the permission allows
    pub description: String,
}

/// A role record with the slugs of the permissions it holds
#[derive(Debug, Deserialize, Clone)]
pub struct RoleFixture {
    /// Natural key
    pub slug: String,
    /// Display name
    pub name: String,
    /// What the role is for
    pub description: String,
    /// Permission slugs
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Languages spoken in one country, highest priority first
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryLanguagesFixture {
    /// Country code
    pub country: String,
    /// Language codes; index 0 is the primary language
    pub languages: Vec<String>,
}

impl CountryLanguagesFixture {
    /// Shorthand used by callers that build mappings in code
    #[must_use]
    pub fn new(country: &str, languages: &[&str]) -> Self {
        Self {
            country: country.to_string(),
            languages: languages.iter().map(|code| (*code).to_string()).collect(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_decimal_places() -> i32 {
    2
}

impl Fixtures {
    /// Parses and validates the dataset compiled into the binary
    pub fn embedded() -> Result<Self> {
        parse_fixtures(EMBEDDED_FIXTURES)
    }

    /// Total number of records across all tables, counting each country's
    /// language list entries individually
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.regions.len()
            + self.languages.len()
            + self.currencies.len()
            + self.countries.len()
            + self.timezones.len()
            + self.permissions.len()
            + self.roles.len()
            + self
                .country_languages
                .iter()
                .map(|entry| entry.languages.len())
                .sum::<usize>()
    }

    /// Rejects blank natural keys and duplicates within a table.
    ///
    /// Unknown parent references are not checked here; seeders skip them.
    pub fn validate(&self) -> Result<()> {
        check_keys("regions", self.regions.iter().map(|r| r.code.as_str()))?;
        check_keys("languages", self.languages.iter().map(|l| l.code.as_str()))?;
        check_keys("currencies", self.currencies.iter().map(|c| c.code.as_str()))?;
        check_keys("countries", self.countries.iter().map(|c| c.code.as_str()))?;
        check_keys("timezones", self.timezones.iter().map(|t| t.name.as_str()))?;
        check_keys("permissions", self.permissions.iter().map(|p| p.slug.as_str()))?;
        check_keys("roles", self.roles.iter().map(|r| r.slug.as_str()))?;

        if let Some(entry) = self
            .country_languages
            .iter()
            .find(|entry| entry.country.trim().is_empty())
        {
            return Err(Error::Fixture {
                message: format!("country_languages entry with blank country: {entry:?}"),
            });
        }
        Ok(())
    }
}

fn check_keys<'a>(table: &str, keys: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.trim().is_empty() {
            return Err(Error::Fixture {
                message: format!("{table}: blank natural key"),
            });
        }
        if !seen.insert(key) {
            return Err(Error::Fixture {
                message: format!("{table}: duplicate natural key '{key}'"),
            });
        }
    }
    Ok(())
}

/// Parses fixture TOML and validates it
pub fn parse_fixtures(contents: &str) -> Result<Fixtures> {
    let fixtures: Fixtures = toml::from_str(contents).map_err(|e| Error::Fixture {
        message: format!("Failed to parse fixtures: {e}"),
    })?;
    fixtures.validate()?;
    debug!("Parsed {} fixture records", fixtures.record_count());
    Ok(fixtures)
}

/// Loads fixtures from a TOML file on disk
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A table contains a blank or duplicate natural key
pub fn load_fixtures<P: AsRef<Path>>(path: P) -> Result<Fixtures> {
    let path_ref = path.as_ref();
    debug!("Loading fixtures from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read fixtures file {}: {e}", path_ref.display()),
    })?;
    parse_fixtures(&contents)
}

/// Loads fixtures from `path` when given, otherwise the embedded dataset
pub fn load_fixtures_or_embedded(path: Option<&Path>) -> Result<Fixtures> {
    path.map_or_else(Fixtures::embedded, load_fixtures)
}
