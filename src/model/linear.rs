// src/model/linear.rs

use crate::errors::AppError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Ordinary least-squares regression with an intercept, solved through
/// the normal equations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, AppError> {
        let (rows, cols) = x.dim();
        if rows == 0 {
            return Err(AppError::TrainError("no rows to fit on".into()));
        }
        if rows != y.len() {
            return Err(AppError::TrainError(format!(
                "feature rows ({rows}) and target rows ({}) differ",
                y.len()
            )));
        }

        // Normal equations over [1 | X]. The tiny ridge term on the
        // diagonal keeps the system solvable when a scaled column is all
        // zeros (a zero-variance feature).
        let k = cols + 1;
        let mut gram = vec![vec![0.0f64; k]; k];
        let mut rhs = vec![0.0f64; k];

        for i in 0..rows {
            let mut row = Vec::with_capacity(k);
            row.push(1.0);
            row.extend(x.row(i).iter().copied());
            for a in 0..k {
                rhs[a] += row[a] * y[i];
                for b in 0..k {
                    gram[a][b] += row[a] * row[b];
                }
            }
        }

        let ridge = 1e-8 * rows as f64;
        for (a, row) in gram.iter_mut().enumerate() {
            row[a] += ridge;
        }

        let solution = solve(gram, rhs)
            .ok_or_else(|| AppError::TrainError("normal equations are singular".into()))?;

        Ok(Self {
            intercept: solution[0],
            coefficients: solution[1..].to_vec(),
        })
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let rows = x.nrows();
        let mut out = Array1::zeros(rows);
        for i in 0..rows {
            out[i] = self.intercept
                + self
                    .coefficients
                    .iter()
                    .zip(x.row(i).iter())
                    .map(|(c, v)| c * v)
                    .sum::<f64>();
        }
        out
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for c in (row + 1)..n {
            acc -= a[row][c] * x[c];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}
