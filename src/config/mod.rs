/// Database connection and schema creation
pub mod database;

/// Reference dataset loading from TOML
pub mod fixtures;
