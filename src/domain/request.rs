// src/domain/request.rs

use crate::domain::columns;
use crate::domain::geo::Region;
use crate::domain::property::{PropertyType, Segment};
use crate::errors::AppError;
use serde::Deserialize;

/// Body of a `POST /predict` request.
///
/// `garden_area` is optional so callers predicting for apartments (which
/// never carry one) can omit it; house models that kept the column see a
/// 0 instead, the same value the cleaner fills missing areas with.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub type_of_property: PropertyType,
    pub number_of_bedrooms: f64,
    pub living_area: f64,
    pub terrace_area: f64,
    #[serde(default)]
    pub garden_area: f64,
    pub surface_of_land: f64,
    pub number_of_facades: f64,
    pub region: Region,
}

impl PredictRequest {
    /// Rejects negative magnitudes, naming the offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("number_of_bedrooms", self.number_of_bedrooms),
            ("living_area", self.living_area),
            ("terrace_area", self.terrace_area),
            ("garden_area", self.garden_area),
            ("surface_of_land", self.surface_of_land),
            ("number_of_facades", self.number_of_facades),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.type_of_property, self.region)
    }

    /// Value of one dataset feature column, by its table name. `None`
    /// means the model was trained on a column this endpoint does not
    /// accept, which is an internal inconsistency the caller reports.
    pub fn feature_value(&self, column: &str) -> Option<f64> {
        match column {
            columns::NUMBER_OF_BEDROOMS => Some(self.number_of_bedrooms),
            columns::LIVING_AREA => Some(self.living_area),
            columns::TERRACE_AREA => Some(self.terrace_area),
            columns::GARDEN_AREA => Some(self.garden_area),
            columns::SURFACE_OF_LAND => Some(self.surface_of_land),
            columns::NUMBER_OF_FACADES => Some(self.number_of_facades),
            _ => None,
        }
    }
}
