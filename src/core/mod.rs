//! Seeding logic, independent of the command line.

/// Role and permission seeders
pub mod access;
/// Chunked bulk insertion
pub mod batch;
/// Country/language association import
pub mod country_language;
/// Natural-key lookup tables
pub mod lookup;
/// Region, language, currency, country and timezone seeders
pub mod reference;
/// Seeder ordering and run reports
pub mod runner;
/// Per-seeder counters
pub mod summary;
