// src/domain/property.rs

use crate::domain::geo::Region;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two property kinds models are trained for. The raw dataset also
/// contains placeholder values (`0`) in its type column; those rows are
/// excluded from segmentation and counted in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            other => Err(AppError::BadRequest(format!(
                "unknown property type '{other}'"
            ))),
        }
    }
}

/// The unit of independent model training: one (property type, region)
/// pair. No row crosses segment boundaries during modeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub property_type: PropertyType,
    pub region: Region,
}

impl Segment {
    pub fn new(property_type: PropertyType, region: Region) -> Self {
        Self {
            property_type,
            region,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.property_type, self.region)
    }
}
