// errors.rs
use crate::domain::property::Segment;
use std::fmt;

/// Errors originating from the batch pipeline (data loading, training)
/// or from the serving layer (routing, missing models, DB).
#[derive(Debug)]
pub enum AppError {
    NotFound,
    BadRequest(String),
    DbError(String),
    /// Problems with the input table: unreadable CSV, missing columns,
    /// wrong column types.
    DataError(String),
    /// A segment ended up with no usable rows on one side of the
    /// train/test split. Reported per segment; never aborts the batch.
    EmptySegment(Segment),
    TrainError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not Found"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::DbError(msg) => write!(f, "Database Error: {msg}"),
            AppError::DataError(msg) => write!(f, "Data Error: {msg}"),
            AppError::EmptySegment(segment) => {
                write!(f, "Empty segment: no rows left to train {segment}")
            }
            AppError::TrainError(msg) => write!(f, "Training Error: {msg}"),
            AppError::InternalError(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}
