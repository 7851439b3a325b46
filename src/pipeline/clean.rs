// src/pipeline/clean.rs

use crate::domain::columns;
use crate::domain::geo::region_of;
use crate::errors::AppError;
use polars::prelude::*;

/// Result of one cleaning pass. Rows can disappear for two reasons and
/// both are surfaced: exact duplicates, and postal codes outside
/// 1000-9999 that map to no region (the caller-visible "drop" decision —
/// such rows are never coerced to a default region).
#[derive(Debug)]
pub struct CleanOutcome {
    pub df: DataFrame,
    pub duplicates_removed: usize,
    pub unmapped_zip_rows_removed: usize,
}

/// Cleans the raw listings table. Order matters:
/// 1. drop exact duplicate rows (first occurrence wins, row order kept);
/// 2. trim whitespace on every string cell;
/// 3. fill nulls — numeric columns with 0, string columns with "unknown";
/// 4. derive `Region` from `Zip code`, dropping unmappable rows;
/// 5. drop the administratively irrelevant columns.
///
/// The output has no null cells, and its column set is the input minus
/// the drop list plus `Region`. Cleaning an already-clean table is a
/// no-op, so re-running the pipeline on its own output is safe.
pub fn clean(df: &DataFrame) -> Result<CleanOutcome, AppError> {
    let mut table = df
        .unique_stable(None, UniqueKeepStrategy::First, None)
        .map_err(|e| AppError::DataError(format!("dedup failed: {e}")))?;
    let duplicates_removed = df.height() - table.height();

    trim_and_fill(&mut table)?;
    let unmapped_zip_rows_removed = derive_region(&mut table)?;

    for name in columns::DROPPED_COLUMNS {
        if table.get_column_names().contains(&name) {
            table = table
                .drop(name)
                .map_err(|e| AppError::DataError(format!("dropping '{name}' failed: {e}")))?;
        }
    }

    Ok(CleanOutcome {
        df: table,
        duplicates_removed,
        unmapped_zip_rows_removed,
    })
}

fn trim_and_fill(table: &mut DataFrame) -> Result<(), AppError> {
    let names: Vec<String> = table
        .get_column_names()
        .into_iter()
        .map(String::from)
        .collect();

    for name in names {
        let series = table
            .column(&name)
            .map_err(|e| AppError::DataError(e.to_string()))?;

        let replacement = match series.dtype() {
            DataType::Utf8 => {
                let ca = series
                    .utf8()
                    .map_err(|e| AppError::DataError(e.to_string()))?;
                let values: Vec<String> = ca
                    .into_iter()
                    .map(|cell| cell.map(str::trim).unwrap_or("unknown").to_string())
                    .collect();
                Some(Series::new(&name, values))
            }
            dtype if is_numeric(dtype) => Some(
                series
                    .fill_null(FillNullStrategy::Zero)
                    .map_err(|e| AppError::DataError(e.to_string()))?,
            ),
            _ => None,
        };

        if let Some(series) = replacement {
            table
                .with_column(series)
                .map_err(|e| AppError::DataError(e.to_string()))?;
        }
    }
    Ok(())
}

fn is_numeric(dtype: &DataType) -> bool {
    use DataType::*;
    matches!(
        dtype,
        Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64 | Float32 | Float64
    )
}

/// Adds the `Region` column and removes rows whose postal code has no
/// region. A table without a `Zip code` column (already cleaned) is left
/// untouched. Returns the number of rows removed.
fn derive_region(table: &mut DataFrame) -> Result<usize, AppError> {
    if !table.get_column_names().contains(&columns::ZIP_CODE) {
        return Ok(0);
    }

    let zips = table
        .column(columns::ZIP_CODE)
        .map_err(|e| AppError::DataError(e.to_string()))?
        .cast(&DataType::Int64)
        .map_err(|e| AppError::DataError(format!("'{}' is not numeric: {e}", columns::ZIP_CODE)))?;
    let zips = zips.i64().map_err(|e| AppError::DataError(e.to_string()))?;

    let regions: Vec<Option<&'static str>> = zips
        .into_iter()
        .map(|zip| zip.and_then(region_of).map(|r| r.as_str()))
        .collect();
    let unmapped = regions.iter().filter(|r| r.is_none()).count();

    if unmapped > 0 {
        let keep: Vec<bool> = regions.iter().map(Option::is_some).collect();
        let mask = BooleanChunked::from_slice("keep", &keep);
        *table = table
            .filter(&mask)
            .map_err(|e| AppError::DataError(e.to_string()))?;
    }

    let region_values: Vec<&str> = regions.into_iter().flatten().collect();
    table
        .with_column(Series::new(columns::REGION, region_values))
        .map_err(|e| AppError::DataError(e.to_string()))?;

    Ok(unmapped)
}
