// src/model/scaler.rs

use crate::errors::AppError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Zero-mean / unit-variance feature scaler.
///
/// Fit on the training split only; the fitted instance transforms both
/// splits and, later, incoming prediction rows. A zero-variance feature
/// keeps a divisor of 1, so a constant training column scales to all
/// zeros rather than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Result<Self, AppError> {
        let (rows, cols) = x.dim();
        if rows == 0 {
            return Err(AppError::TrainError(
                "cannot fit a scaler on zero rows".into(),
            ));
        }

        let mut means = Vec::with_capacity(cols);
        let mut scales = Vec::with_capacity(cols);
        for j in 0..cols {
            let column = x.column(j);
            let mean = column.sum() / rows as f64;
            let var = column.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / rows as f64;
            let std = var.sqrt();
            means.push(mean);
            scales.push(if std == 0.0 { 1.0 } else { std });
        }
        Ok(Self { means, scales })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, AppError> {
        let (rows, cols) = x.dim();
        if cols != self.means.len() {
            return Err(AppError::InternalError(format!(
                "scaler fitted on {} features, got {cols}",
                self.means.len()
            )));
        }
        let mut out = x.clone();
        for i in 0..rows {
            for j in 0..cols {
                out[[i, j]] = (x[[i, j]] - self.means[j]) / self.scales[j];
            }
        }
        Ok(out)
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, AppError> {
        if row.len() != self.means.len() {
            return Err(AppError::InternalError(format!(
                "scaler fitted on {} features, got {}",
                self.means.len(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, v)| (v - self.means[j]) / self.scales[j])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn training_mean_scales_to_zero() {
        let train = array![[1.0, 100.0], [3.0, 200.0], [5.0, 300.0]];
        let scaler = StandardScaler::fit(&train).unwrap();

        // A row equal to the per-feature training mean maps to 0.
        let scaled = scaler.transform_row(&[3.0, 200.0]).unwrap();
        for value in scaled {
            assert!(value.abs() < 1e-12);
        }
    }

    #[test]
    fn transform_uses_training_statistics_not_its_own() {
        let train = array![[0.0], [10.0]];
        let scaler = StandardScaler::fit(&train).unwrap();

        // Test data with a very different distribution still gets the
        // training mean (5) and scale (5).
        let test = array![[20.0]];
        let scaled = scaler.transform(&test).unwrap();
        assert!((scaled[[0, 0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_becomes_all_zeros() {
        let train = array![[7.0, 1.0], [7.0, 2.0], [7.0, 3.0]];
        let scaler = StandardScaler::fit(&train).unwrap();
        let scaled = scaler.transform(&train).unwrap();
        for i in 0..3 {
            assert_eq!(scaled[[i, 0]], 0.0);
        }
    }

    #[test]
    fn feature_count_mismatch_is_an_error() {
        let train = array![[1.0, 2.0]];
        let scaler = StandardScaler::fit(&train).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
    }
}
