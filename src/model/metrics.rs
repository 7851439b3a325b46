// src/model/metrics.rs
//
// Regression metrics reported for every trained segment model.

use ndarray::ArrayView1;

/// Mean squared error: mean((pred - truth)^2). Lower is better.
pub fn mean_squared_error(truth: ArrayView1<f64>, pred: ArrayView1<f64>) -> f64 {
    let n = truth.len();
    if n == 0 {
        return 0.0;
    }
    truth
        .iter()
        .zip(pred.iter())
        .map(|(t, p)| (p - t) * (p - t))
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination. 1 is a perfect prediction.
///
/// With a constant target the denominator is zero; the score is then 1
/// when the residuals are also (numerically) zero and 0 otherwise.
pub fn r2_score(truth: ArrayView1<f64>, pred: ArrayView1<f64>) -> f64 {
    let n = truth.len();
    if n == 0 {
        return 0.0;
    }
    let mean = truth.sum() / n as f64;
    let ss_res: f64 = truth
        .iter()
        .zip(pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = truth.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res < 1e-12 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
