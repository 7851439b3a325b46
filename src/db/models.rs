// src/db/models.rs

use crate::db::connection::Database;
use crate::domain::geo::Region;
use crate::domain::property::{PropertyType, Segment};
use crate::errors::AppError;
use crate::model::artifact::{ModelArtifact, ModelKind};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

/// Evaluation scores for one trained model, on both splits.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ModelScores {
    pub train_mse: f64,
    pub test_mse: f64,
    pub train_r2: f64,
    pub test_r2: f64,
}

/// Store-level view of one models row, without the artifact blob.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelRow {
    pub property_type: PropertyType,
    pub region: Region,
    pub model_kind: ModelKind,
    pub scores: ModelScores,
    pub n_train: usize,
    pub n_test: usize,
    pub trained_at: String,
}

/// Upserts one artifact under its (property type, region, kind) key.
/// Retraining the same segment replaces the previous row.
pub fn save_artifact(
    db: &Database,
    artifact: &ModelArtifact,
    scores: &ModelScores,
    n_train: usize,
    n_test: usize,
) -> Result<(), AppError> {
    let artifact_json =
        serde_json::to_string(artifact).map_err(|e| AppError::DbError(e.to_string()))?;
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO models (
                property_type, region, model_kind, artifact_json,
                train_mse, test_mse, train_r2, test_r2,
                n_train, n_test, trained_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(property_type, region, model_kind) DO UPDATE SET
                artifact_json = excluded.artifact_json,
                train_mse = excluded.train_mse,
                test_mse = excluded.test_mse,
                train_r2 = excluded.train_r2,
                test_r2 = excluded.test_r2,
                n_train = excluded.n_train,
                n_test = excluded.n_test,
                trained_at = excluded.trained_at
            "#,
            params![
                artifact.segment.property_type.as_str(),
                artifact.segment.region.as_str(),
                artifact.regressor.kind().as_str(),
                artifact_json,
                scores.train_mse,
                scores.test_mse,
                scores.train_r2,
                scores.test_r2,
                n_train as i64,
                n_test as i64,
                now,
            ],
        )
        .map_err(|e| AppError::DbError(e.to_string()))?;
        Ok(())
    })
}

/// Loads the artifact for a segment's preferred model: lowest test MSE,
/// model-kind name as the deterministic tie break. `None` when the
/// segment has never been trained.
pub fn load_best_artifact(
    db: &Database,
    segment: &Segment,
) -> Result<Option<ModelArtifact>, AppError> {
    db.with_conn(|conn| {
        let json: Option<String> = conn
            .query_row(
                r#"
                SELECT artifact_json
                FROM models
                WHERE property_type = ?1 AND region = ?2
                ORDER BY test_mse ASC, model_kind ASC
                LIMIT 1
                "#,
                params![
                    segment.property_type.as_str(),
                    segment.region.as_str()
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AppError::DbError(e.to_string()))?;

        match json {
            Some(json) => {
                let artifact = serde_json::from_str(&json)
                    .map_err(|e| AppError::InternalError(format!("corrupt artifact: {e}")))?;
                Ok(Some(artifact))
            }
            None => Ok(None),
        }
    })
}

/// Every trained model row, for the `/models` listing.
pub fn list_models(db: &Database) -> Result<Vec<ModelRow>, AppError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT
                    property_type,  -- 0
                    region,         -- 1
                    model_kind,     -- 2
                    train_mse,      -- 3
                    test_mse,       -- 4
                    train_r2,       -- 5
                    test_r2,        -- 6
                    n_train,        -- 7
                    n_test,         -- 8
                    trained_at      -- 9
                FROM models
                ORDER BY property_type, region, model_kind
                "#,
            )
            .map_err(|e| AppError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, f64>(6)?,
                    row.get::<_, i64>(7)?,
                    row.get::<_, i64>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .map_err(|e| AppError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            let (ptype, region, kind, train_mse, test_mse, train_r2, test_r2, n_train, n_test, trained_at) =
                row.map_err(|e| AppError::DbError(e.to_string()))?;
            out.push(ModelRow {
                property_type: ptype.parse()?,
                region: region.parse()?,
                model_kind: kind.parse()?,
                scores: ModelScores {
                    train_mse,
                    test_mse,
                    train_r2,
                    test_r2,
                },
                n_train: n_train as usize,
                n_test: n_test as usize,
                trained_at,
            });
        }
        Ok(out)
    })
}
