// src/domain/columns.rs
//
// Column names of the listings dataset, exactly as they appear in the
// CSV header. Everything that touches the table goes through these
// constants so a header rename only hits one file.

pub const RAW_NUM: &str = "Raw num:";
pub const ID_NUMBER: &str = "ID number";
pub const URL: &str = "URL";
pub const LOCALITY: &str = "Locality";
pub const ZIP_CODE: &str = "Zip code";
pub const TYPE_OF_PROPERTY: &str = "Type of property";
pub const SUBTYPE_OF_PROPERTY: &str = "Subtype of property";
pub const PRICE: &str = "Price of property in euro";
pub const TYPE_OF_SALE: &str = "Type of Sale";
pub const NUMBER_OF_BEDROOMS: &str = "Number of bedrooms";
pub const LIVING_AREA: &str = "Living area";
pub const KITCHEN: &str = "Kitchen";
pub const TERRACE: &str = "Terrace";
pub const TERRACE_AREA: &str = "Terrace area";
pub const GARDEN: &str = "Garden";
pub const GARDEN_AREA: &str = "Garden area";
pub const SURFACE_OF_LAND: &str = "Surface of the land";
pub const NUMBER_OF_FACADES: &str = "Number of facades";
pub const SWIMMING_POOL: &str = "Swimming pool";
pub const STATE_OF_BUILDING: &str = "State of the building";

/// Derived by the cleaner from `Zip code`.
pub const REGION: &str = "Region";
/// Derived inside the exploratory report only.
pub const COMMUNITY: &str = "Community";

/// Administratively irrelevant columns removed by the cleaner: raw
/// identifiers, URLs, free-text locality, and categorical flags
/// superseded by the derived `Region`.
pub const DROPPED_COLUMNS: [&str; 12] = [
    ZIP_CODE,
    LOCALITY,
    TYPE_OF_SALE,
    STATE_OF_BUILDING,
    SUBTYPE_OF_PROPERTY,
    GARDEN,
    SWIMMING_POOL,
    TERRACE,
    KITCHEN,
    RAW_NUM,
    ID_NUMBER,
    URL,
];
