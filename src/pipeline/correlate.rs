// src/pipeline/correlate.rs

use crate::errors::AppError;
use ndarray::Array2;
use polars::prelude::*;

/// Columns correlating more strongly than this with a later column are
/// considered redundant.
pub const REDUNDANCY_THRESHOLD: f64 = 0.95;

/// Pairwise Pearson correlation of the numeric columns, in the table's
/// column order. A zero-variance column correlates 0 with everything.
pub fn correlation_matrix(df: &DataFrame) -> Result<(Vec<String>, Array2<f64>), AppError> {
    let columns = numeric_columns(df)?;
    let n = columns.len();
    let mut matrix = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        matrix[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&columns[i].1, &columns[j].1);
            matrix[[i, j]] = r;
            matrix[[j, i]] = r;
        }
    }

    let names = columns.into_iter().map(|(name, _)| name).collect();
    Ok((names, matrix))
}

/// Removes numeric columns whose absolute correlation with any *later*
/// column exceeds [`REDUNDANCY_THRESHOLD`].
///
/// The scan looks forward only, so the result is deterministic for a
/// fixed input column ordering, and reordering columns can change which
/// of two correlated columns survives. That order dependence is the
/// contract, not an accident: callers rely on a stable column order
/// producing a stable feature set.
pub fn drop_redundant(df: &DataFrame) -> Result<DataFrame, AppError> {
    drop_redundant_above(df, REDUNDANCY_THRESHOLD)
}

pub fn drop_redundant_above(df: &DataFrame, threshold: f64) -> Result<DataFrame, AppError> {
    let (names, matrix) = correlation_matrix(df)?;

    let mut to_drop = Vec::new();
    for i in 0..names.len() {
        let redundant = ((i + 1)..names.len()).any(|j| matrix[[i, j]].abs() > threshold);
        if redundant {
            to_drop.push(names[i].clone());
        }
    }

    let mut out = df.clone();
    for name in &to_drop {
        out = out
            .drop(name)
            .map_err(|e| AppError::DataError(e.to_string()))?;
    }
    Ok(out)
}

/// Numeric columns as f64 vectors, in column order. Cleaned tables have
/// no nulls; any null that sneaks in counts as 0, matching the fill rule.
pub fn numeric_columns(df: &DataFrame) -> Result<Vec<(String, Vec<f64>)>, AppError> {
    let mut out = Vec::new();
    for series in df.get_columns() {
        if !is_numeric(series.dtype()) {
            continue;
        }
        let casted = series
            .cast(&DataType::Float64)
            .map_err(|e| AppError::DataError(e.to_string()))?;
        let ca = casted
            .f64()
            .map_err(|e| AppError::DataError(e.to_string()))?;
        let values: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        out.push((series.name().to_string(), values));
    }
    Ok(out)
}

fn is_numeric(dtype: &DataType) -> bool {
    use DataType::*;
    matches!(
        dtype,
        Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64 | Float32 | Float64
    )
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_of_linear_relation_is_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [10.0, 20.0, 30.0, 40.0];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);

        let inverse = [40.0, 30.0, 20.0, 10.0];
        assert!((pearson(&a, &inverse) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_correlates_zero() {
        let flat = [5.0, 5.0, 5.0];
        let other = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&flat, &other), 0.0);
    }

    #[test]
    fn drops_the_earlier_of_a_perfectly_correlated_pair() {
        let df = df!(
            "area" => &[100.0, 200.0, 300.0, 400.0],
            "area_copy" => &[10.0, 20.0, 30.0, 40.0],
            "price" => &[1.0, 7.0, 2.0, 9.0],
        )
        .unwrap();

        let reduced = drop_redundant(&df).unwrap();
        let names = reduced.get_column_names();
        // "area" sees a perfect correlation with the later "area_copy"
        // and goes; "area_copy" has no later partner and survives.
        assert!(!names.contains(&"area"));
        assert!(names.contains(&"area_copy"));
        assert!(names.contains(&"price"));
    }

    #[test]
    fn keeps_columns_at_or_below_the_threshold() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 100.0],
            "b" => &[1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();
        let (_, matrix) = correlation_matrix(&df).unwrap();
        assert!(matrix[[0, 1]].abs() <= REDUNDANCY_THRESHOLD);

        let reduced = drop_redundant(&df).unwrap();
        assert_eq!(reduced.width(), 2);
    }

    #[test]
    fn ignores_string_columns() {
        let df = df!(
            "kind" => &["house", "house", "apartment"],
            "x" => &[1.0, 2.0, 3.0],
            "y" => &[2.0, 4.0, 6.0],
        )
        .unwrap();

        let reduced = drop_redundant(&df).unwrap();
        let names = reduced.get_column_names();
        assert!(names.contains(&"kind"));
        assert!(!names.contains(&"x"));
        assert!(names.contains(&"y"));
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let df = df!(
            "a" => &[1.0, 3.0, 2.0, 8.0],
            "b" => &[4.0, 1.0, 9.0, 2.0],
            "c" => &[1.0, 1.0, 2.0, 5.0],
        )
        .unwrap();
        let (names, matrix) = correlation_matrix(&df).unwrap();
        assert_eq!(names.len(), 3);
        for i in 0..3 {
            assert!((matrix[[i, i]] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((matrix[[i, j]] - matrix[[j, i]]).abs() < 1e-12);
            }
        }
    }
}
