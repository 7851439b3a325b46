// src/model/trainer.rs

use crate::db::models::{save_artifact, ModelScores};
use crate::db::Database;
use crate::domain::columns;
use crate::domain::property::{PropertyType, Segment};
use crate::errors::AppError;
use crate::model::artifact::{ModelArtifact, ModelKind, Regressor};
use crate::model::gbdt::{GbdtConfig, GbdtRegressor};
use crate::model::linear::LinearRegressor;
use crate::model::metrics::{mean_squared_error, r2_score};
use crate::model::scaler::StandardScaler;
use crate::pipeline::correlate::{drop_redundant, numeric_columns};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Share of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the split shuffle. Same seed, same input -> same split.
    pub seed: u64,
    pub gbdt: GbdtConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            gbdt: GbdtConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub kind: ModelKind,
    pub scores: ModelScores,
}

#[derive(Debug, Clone)]
pub struct SegmentReport {
    pub segment: Segment,
    pub rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub feature_names: Vec<String>,
    pub models: Vec<TrainedModel>,
}

/// Trains both regressors for one segment and persists each artifact
/// under its (property type, region, kind) key.
///
/// The segment table arrives cleaned and outlier-filtered. Here it is
/// correlation-reduced, stripped of `Garden area` for apartments, and
/// split 80/20 with the configured seed; the scaler is fitted on the
/// training split only and reused for the test split and, via the
/// artifact, for serving.
pub fn train_segment(
    db: &Database,
    df: &DataFrame,
    segment: Segment,
    cfg: &TrainConfig,
) -> Result<SegmentReport, AppError> {
    if df.height() == 0 {
        return Err(AppError::EmptySegment(segment));
    }

    let mut table = drop_redundant(df)?;
    if segment.property_type == PropertyType::Apartment
        && table.get_column_names().contains(&columns::GARDEN_AREA)
    {
        table = table
            .drop(columns::GARDEN_AREA)
            .map_err(|e| AppError::DataError(e.to_string()))?;
    }

    // numeric_columns maps any stray null to 0, the dataset's fill value.
    let mut numeric = numeric_columns(&table)?;
    let price_idx = numeric
        .iter()
        .position(|(name, _)| name == columns::PRICE)
        .ok_or_else(|| {
            AppError::TrainError(format!(
                "segment {segment} has no '{}' column to train on",
                columns::PRICE
            ))
        })?;
    let (_, target) = numeric.remove(price_idx);
    let features = numeric;
    if features.is_empty() {
        return Err(AppError::TrainError(format!(
            "segment {segment} has no feature columns left"
        )));
    }

    let n = target.len();
    let (train_idx, test_idx) = split_indices(n, cfg.test_fraction, cfg.seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(AppError::EmptySegment(segment));
    }

    let x_train = matrix(&features, &train_idx);
    let x_test = matrix(&features, &test_idx);
    let y_train = vector(&target, &train_idx);
    let y_test = vector(&target, &test_idx);

    let scaler = StandardScaler::fit(&x_train)?;
    let x_train = scaler.transform(&x_train)?;
    let x_test = scaler.transform(&x_test)?;

    let feature_names: Vec<String> = features.into_iter().map(|(name, _)| name).collect();
    let mut models = Vec::new();

    for kind in [ModelKind::Linear, ModelKind::GradientBoosting] {
        let regressor = match kind {
            ModelKind::Linear => Regressor::Linear(LinearRegressor::fit(&x_train, &y_train)?),
            ModelKind::GradientBoosting => {
                Regressor::GradientBoosting(GbdtRegressor::fit(&x_train, &y_train, &cfg.gbdt)?)
            }
        };

        let scores = evaluate(&regressor, &x_train, &y_train, &x_test, &y_test);
        let artifact = ModelArtifact {
            segment,
            feature_names: feature_names.clone(),
            scaler: scaler.clone(),
            regressor,
        };
        save_artifact(db, &artifact, &scores, train_idx.len(), test_idx.len())?;

        print_scores(kind, segment, &scores);
        models.push(TrainedModel { kind, scores });
    }

    Ok(SegmentReport {
        segment,
        rows: n,
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        feature_names,
        models,
    })
}

/// Deterministic shuffled 80/20 split. The test side takes
/// ceil(n * fraction) rows, so a single-row segment yields an empty
/// training side and the caller reports EmptySegment.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n);
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

fn matrix(features: &[(String, Vec<f64>)], indices: &[usize]) -> Array2<f64> {
    Array2::from_shape_fn((indices.len(), features.len()), |(i, j)| {
        features[j].1[indices[i]]
    })
}

fn vector(values: &[f64], indices: &[usize]) -> Array1<f64> {
    Array1::from_iter(indices.iter().map(|&i| values[i]))
}

fn evaluate(
    regressor: &Regressor,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    x_test: &Array2<f64>,
    y_test: &Array1<f64>,
) -> ModelScores {
    let pred_train = regressor.predict(x_train);
    let pred_test = regressor.predict(x_test);
    ModelScores {
        train_mse: mean_squared_error(y_train.view(), pred_train.view()),
        test_mse: mean_squared_error(y_test.view(), pred_test.view()),
        train_r2: r2_score(y_train.view(), pred_train.view()),
        test_r2: r2_score(y_test.view(), pred_test.view()),
    }
}

fn print_scores(kind: ModelKind, segment: Segment, scores: &ModelScores) {
    let (ptype, region) = (segment.property_type, segment.region);
    println!("----{} Results for {ptype} in {region}----", kind.label());
    println!("Mean squared error (train) for {ptype} in {region}: {:.2}", scores.train_mse);
    println!("Mean squared error (test) for {ptype} in {region}: {:.2}", scores.test_mse);
    println!(
        "Coefficient of determination R^2 (train) for {ptype} in {region}: {:.2}",
        scores.train_r2
    );
    println!(
        "Coefficient of determination R^2 (test) for {ptype} in {region}: {:.2}",
        scores.test_r2
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::domain::geo::Region;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_db() -> Database {
        let path = std::env::temp_dir().join(format!(
            "trainer_test_{}.sqlite",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let db = Database::new(path.to_str().unwrap());
        init_db(&db).expect("Failed to initialize DB");
        db
    }

    fn segment_table(rows: usize) -> DataFrame {
        // Price depends on both features with comparable weight, so
        // neither crosses the 0.95 redundancy threshold against it.
        let areas: Vec<f64> = (0..rows).map(|i| 80.0 + 10.0 * i as f64).collect();
        let bedrooms: Vec<f64> = (0..rows).map(|i| 1.0 + (i % 4) as f64).collect();
        let prices: Vec<f64> = areas
            .iter()
            .zip(bedrooms.iter())
            .map(|(a, b)| 1500.0 * a + 200_000.0 * b)
            .collect();
        df!(
            columns::NUMBER_OF_BEDROOMS => bedrooms,
            columns::LIVING_AREA => areas,
            columns::PRICE => prices,
        )
        .unwrap()
    }

    #[test]
    fn split_is_deterministic_for_a_fixed_seed() {
        let a = split_indices(100, 0.2, 42);
        let b = split_indices(100, 0.2, 42);
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 80);
        assert_eq!(a.1.len(), 20);

        let c = split_indices(100, 0.2, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn split_partitions_all_rows() {
        let (train, test) = split_indices(17, 0.2, 42);
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..17).collect::<Vec<_>>());
        // ceil(17 * 0.2) = 4 test rows.
        assert_eq!(test.len(), 4);
    }

    #[test]
    fn trains_and_persists_both_models() {
        let db = make_db();
        let segment = Segment::new(PropertyType::House, Region::Antwerp);
        let report =
            train_segment(&db, &segment_table(40), segment, &TrainConfig::default()).unwrap();

        assert_eq!(report.rows, 40);
        assert_eq!(report.n_test, 8);
        assert_eq!(report.n_train, 32);
        assert_eq!(report.models.len(), 2);
        // The relation is exactly linear, so OLS nails it.
        let linear = &report.models[0];
        assert_eq!(linear.kind, ModelKind::Linear);
        assert!(linear.scores.test_r2 > 0.99, "r2 {}", linear.scores.test_r2);

        let stored = crate::db::models::list_models(&db).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().any(|m| m.model_kind == ModelKind::Linear));
        assert!(stored
            .iter()
            .any(|m| m.model_kind == ModelKind::GradientBoosting));
    }

    #[test]
    fn empty_segment_fails_loudly() {
        let db = make_db();
        let segment = Segment::new(PropertyType::House, Region::Antwerp);
        let empty = segment_table(0);
        let err = train_segment(&db, &empty, segment, &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::EmptySegment(_)));
    }

    #[test]
    fn single_row_segment_is_degenerate() {
        // One row splits 1/0: the whole row lands in the test side and
        // there is nothing to fit on.
        let db = make_db();
        let segment = Segment::new(PropertyType::House, Region::Antwerp);
        let err =
            train_segment(&db, &segment_table(1), segment, &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::EmptySegment(_)));
    }

    #[test]
    fn apartments_drop_the_garden_column() {
        let db = make_db();
        let mut table = segment_table(30);
        let gardens: Vec<f64> = (0..30).map(|i| (i % 7) as f64 * 15.0).collect();
        table
            .with_column(Series::new(columns::GARDEN_AREA, gardens))
            .unwrap();

        let segment = Segment::new(PropertyType::Apartment, Region::EastFlanders);
        let report = train_segment(&db, &table, segment, &TrainConfig::default()).unwrap();
        assert!(!report
            .feature_names
            .iter()
            .any(|n| n == columns::GARDEN_AREA));

        let house = Segment::new(PropertyType::House, Region::Antwerp);
        let report = train_segment(&db, &table, house, &TrainConfig::default()).unwrap();
        assert!(report
            .feature_names
            .iter()
            .any(|n| n == columns::GARDEN_AREA));
    }

    #[test]
    fn retraining_overwrites_the_same_keys() {
        let db = make_db();
        let segment = Segment::new(PropertyType::House, Region::Antwerp);
        train_segment(&db, &segment_table(30), segment, &TrainConfig::default()).unwrap();
        train_segment(&db, &segment_table(35), segment, &TrainConfig::default()).unwrap();

        let stored = crate::db::models::list_models(&db).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|m| m.n_train + m.n_test == 35));
    }
}
