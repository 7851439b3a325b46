// src/model/artifact.rs

use crate::domain::property::Segment;
use crate::domain::request::PredictRequest;
use crate::errors::AppError;
use crate::model::gbdt::GbdtRegressor;
use crate::model::linear::LinearRegressor;
use crate::model::scaler::StandardScaler;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two regressor families an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    GradientBoosting,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::GradientBoosting => "gradient_boosting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::GradientBoosting => "Gradient Boosting Regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(ModelKind::Linear),
            "gradient_boosting" => Ok(ModelKind::GradientBoosting),
            other => Err(AppError::InternalError(format!(
                "unknown model kind '{other}' in store"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum Regressor {
    #[serde(rename = "linear")]
    Linear(LinearRegressor),
    #[serde(rename = "gradient_boosting")]
    GradientBoosting(GbdtRegressor),
}

impl Regressor {
    pub fn kind(&self) -> ModelKind {
        match self {
            Regressor::Linear(_) => ModelKind::Linear,
            Regressor::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Regressor::Linear(model) => model.predict_row(row),
            Regressor::GradientBoosting(model) => model.predict_row(row),
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        match self {
            Regressor::Linear(model) => model.predict(x),
            Regressor::GradientBoosting(model) => model.predict(x),
        }
    }
}

/// One persisted per-segment model: the surviving feature columns, the
/// scaler fitted on that segment's training split, and the regressor.
/// Everything inference needs travels together, so a prediction always
/// sees the exact preprocessing its model was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub segment: Segment,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub regressor: Regressor,
}

impl ModelArtifact {
    /// Predicts a price for one request. The stored feature-name list
    /// drives assembly of the raw vector, so models trained on
    /// different surviving column sets all serve correctly.
    pub fn predict(&self, request: &PredictRequest) -> Result<f64, AppError> {
        let raw: Vec<f64> = self
            .feature_names
            .iter()
            .map(|name| {
                request.feature_value(name).ok_or_else(|| {
                    AppError::InternalError(format!(
                        "model for {} was trained on column '{name}', which this endpoint has no value for",
                        self.segment
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let scaled = self.scaler.transform_row(&raw)?;
        Ok(self.regressor.predict_row(&scaled))
    }
}
