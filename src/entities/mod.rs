//! Entity module - Contains all SeaORM entity definitions for the reference tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod country;
pub mod country_language;
pub mod currency;
pub mod language;
pub mod permission;
pub mod region;
pub mod role;
pub mod role_permission;
pub mod timezone;

// Re-export specific types to avoid conflicts
pub use country::{Column as CountryColumn, Entity as Country, Model as CountryModel};
pub use country_language::{
    Column as CountryLanguageColumn, Entity as CountryLanguage, Model as CountryLanguageModel,
};
pub use currency::{Column as CurrencyColumn, Entity as Currency, Model as CurrencyModel};
pub use language::{Column as LanguageColumn, Entity as Language, Model as LanguageModel};
pub use permission::{Column as PermissionColumn, Entity as Permission, Model as PermissionModel};
pub use region::{Column as RegionColumn, Entity as Region, Model as RegionModel};
pub use role::{Column as RoleColumn, Entity as Role, Model as RoleModel};
pub use role_permission::{
    Column as RolePermissionColumn, Entity as RolePermission, Model as RolePermissionModel,
};
pub use timezone::{Column as TimezoneColumn, Entity as Timezone, Model as TimezoneModel};
