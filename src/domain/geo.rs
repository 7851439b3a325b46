// src/domain/geo.rs
//
// Postal-code classifiers for the two Belgian geographic groupings used
// by the pipeline. Regions drive model segmentation; communities only
// appear in the exploratory correlation report. The two classifiers are
// independent even though both consume the same postal codes.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 11 provincial/capital divisions derived from the postal
/// code. The ranges are disjoint and cover 1000-9999 exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Brussels-Capital")]
    BrusselsCapital,
    #[serde(rename = "Walloon Brabant")]
    WalloonBrabant,
    #[serde(rename = "Flemish Brabant")]
    FlemishBrabant,
    #[serde(rename = "Antwerp")]
    Antwerp,
    #[serde(rename = "Limburg")]
    Limburg,
    #[serde(rename = "Liege")]
    Liege,
    #[serde(rename = "Namur")]
    Namur,
    #[serde(rename = "Hainaut")]
    Hainaut,
    #[serde(rename = "Luxembourg")]
    Luxembourg,
    #[serde(rename = "West Flanders")]
    WestFlanders,
    #[serde(rename = "East Flanders")]
    EastFlanders,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::BrusselsCapital,
        Region::WalloonBrabant,
        Region::FlemishBrabant,
        Region::Antwerp,
        Region::Limburg,
        Region::Liege,
        Region::Namur,
        Region::Hainaut,
        Region::Luxembourg,
        Region::WestFlanders,
        Region::EastFlanders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::BrusselsCapital => "Brussels-Capital",
            Region::WalloonBrabant => "Walloon Brabant",
            Region::FlemishBrabant => "Flemish Brabant",
            Region::Antwerp => "Antwerp",
            Region::Limburg => "Limburg",
            Region::Liege => "Liege",
            Region::Namur => "Namur",
            Region::Hainaut => "Hainaut",
            Region::Luxembourg => "Luxembourg",
            Region::WestFlanders => "West Flanders",
            Region::EastFlanders => "East Flanders",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| AppError::BadRequest(format!("unknown region '{s}'")))
    }
}

/// Maps a postal code to its region.
///
/// Returns `None` for any code outside 1000-9999. Callers decide whether
/// to drop or flag such rows; this function never substitutes a default
/// region.
pub fn region_of(zip_code: i64) -> Option<Region> {
    match zip_code {
        1000..=1299 => Some(Region::BrusselsCapital),
        1300..=1499 => Some(Region::WalloonBrabant),
        1500..=1999 | 3000..=3499 => Some(Region::FlemishBrabant),
        2000..=2999 => Some(Region::Antwerp),
        3500..=3999 => Some(Region::Limburg),
        4000..=4999 => Some(Region::Liege),
        5000..=5999 => Some(Region::Namur),
        6000..=6599 | 7000..=7999 => Some(Region::Hainaut),
        6600..=6999 => Some(Region::Luxembourg),
        8000..=8999 => Some(Region::WestFlanders),
        9000..=9999 => Some(Region::EastFlanders),
        _ => None,
    }
}

/// The coarser 4-way grouping used by the exploratory report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Community {
    #[serde(rename = "Wallonia")]
    Wallonia,
    #[serde(rename = "German-speaking community")]
    GermanSpeaking,
    #[serde(rename = "Brussels region")]
    BrusselsRegion,
    #[serde(rename = "Flanders")]
    Flanders,
}

impl Community {
    pub fn as_str(&self) -> &'static str {
        match self {
            Community::Wallonia => "Wallonia",
            Community::GermanSpeaking => "German-speaking community",
            Community::BrusselsRegion => "Brussels region",
            Community::Flanders => "Flanders",
        }
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a postal code to its community.
///
/// Same domain contract as [`region_of`]: `None` outside 1000-9999.
pub fn community_of(zip_code: i64) -> Option<Community> {
    match zip_code {
        1000..=1299 => Some(Community::BrusselsRegion),
        1300..=1499 | 5000..=7999 => Some(Community::Wallonia),
        1500..=3999 => Some(Community::Flanders),
        4000..=4999 => Some(Community::GermanSpeaking),
        8000..=9999 => Some(Community::Flanders),
        _ => None,
    }
}
