// src/pipeline/explore.rs
//
// Exploratory correlation analysis: per (community, property type) and
// per (region, property type), the pairwise Pearson correlation of the
// numeric listing columns, rendered as a text table.

use crate::domain::columns;
use crate::domain::geo::{community_of, region_of};
use crate::errors::AppError;
use crate::pipeline::correlate::correlation_matrix;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Which geographic grouping a report slices by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Community,
    Region,
}

impl Grouping {
    fn title(&self) -> &'static str {
        match self {
            Grouping::Community => "Community",
            Grouping::Region => "Region",
        }
    }

    fn label_of(&self, zip: i64) -> Option<&'static str> {
        match self {
            Grouping::Community => community_of(zip).map(|c| c.as_str()),
            Grouping::Region => region_of(zip).map(|r| r.as_str()),
        }
    }
}

/// Builds the correlation report for one grouping over the raw table.
/// Rows with an out-of-range postal code or a placeholder property type
/// are skipped, as in training.
pub fn correlation_report(raw: &DataFrame, grouping: Grouping) -> Result<String, AppError> {
    let zips = raw
        .column(columns::ZIP_CODE)
        .map_err(|e| AppError::DataError(format!("missing column '{}': {e}", columns::ZIP_CODE)))?
        .cast(&DataType::Int64)
        .map_err(|e| AppError::DataError(e.to_string()))?;
    let zips = zips.i64().map_err(|e| AppError::DataError(e.to_string()))?;

    let types = raw
        .column(columns::TYPE_OF_PROPERTY)
        .map_err(|e| {
            AppError::DataError(format!(
                "missing column '{}': {e}",
                columns::TYPE_OF_PROPERTY
            ))
        })?
        .utf8()
        .map_err(|e| AppError::DataError(e.to_string()))?;

    let mut groups: BTreeMap<(String, String), Vec<u32>> = BTreeMap::new();
    for (i, (zip, ptype)) in zips.into_iter().zip(types.into_iter()).enumerate() {
        let label = zip.and_then(|z| grouping.label_of(z));
        let ptype = ptype.and_then(|t| t.parse::<crate::domain::property::PropertyType>().ok());
        if let (Some(label), Some(ptype)) = (label, ptype) {
            groups
                .entry((label.to_string(), ptype.to_string()))
                .or_default()
                .push(i as u32);
        }
    }

    let mut out = String::new();
    for ((label, ptype), indices) in groups {
        let take = UInt32Chunked::from_vec("", indices);
        let mut group_df = raw
            .take(&take)
            .map_err(|e| AppError::DataError(e.to_string()))?;
        // The postal code is a label here, not a measurement.
        if group_df.get_column_names().contains(&columns::ZIP_CODE) {
            group_df = group_df
                .drop(columns::ZIP_CODE)
                .map_err(|e| AppError::DataError(e.to_string()))?;
        }

        let (names, matrix) = correlation_matrix(&group_df)?;
        if names.is_empty() {
            continue;
        }

        writeln!(
            out,
            "{}: {label}, Type of property: {ptype} ({} rows)",
            grouping.title(),
            group_df.height()
        )
        .ok();
        render_matrix(&mut out, &names, &matrix);
        out.push('\n');
    }
    Ok(out)
}

fn render_matrix(out: &mut String, names: &[String], matrix: &ndarray::Array2<f64>) {
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(6);
    write!(out, "{:width$}", "").ok();
    for name in names {
        write!(out, "  {name:>width$}").ok();
    }
    out.push('\n');
    for (i, name) in names.iter().enumerate() {
        write!(out, "{name:width$}").ok();
        for j in 0..names.len() {
            write!(out, "  {:>width$.2}", matrix[[i, j]]).ok();
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> DataFrame {
        df!(
            columns::ZIP_CODE => &[2000i64, 2010, 2020, 9000, 9010, 123],
            columns::TYPE_OF_PROPERTY => &["house", "house", "house", "apartment", "apartment", "house"],
            columns::LIVING_AREA => &[120.0, 150.0, 180.0, 80.0, 95.0, 70.0],
            columns::PRICE => &[350_000.0, 420_000.0, 500_000.0, 250_000.0, 280_000.0, 90_000.0],
        )
        .unwrap()
    }

    #[test]
    fn groups_by_community_and_type() {
        let report = correlation_report(&raw_table(), Grouping::Community).unwrap();
        // Antwerp zips are Flanders; 9000s too. The zip 123 row is skipped.
        assert!(report.contains("Community: Flanders, Type of property: house (3 rows)"));
        assert!(report.contains("Community: Flanders, Type of property: apartment (2 rows)"));
        assert!(report.contains(columns::LIVING_AREA));
        assert!(!report.contains("123"));
    }

    #[test]
    fn groups_by_region_and_type() {
        let report = correlation_report(&raw_table(), Grouping::Region).unwrap();
        assert!(report.contains("Region: Antwerp, Type of property: house (3 rows)"));
        assert!(report.contains("Region: East Flanders, Type of property: apartment (2 rows)"));
    }

    #[test]
    fn diagonal_is_one() {
        let report = correlation_report(&raw_table(), Grouping::Region).unwrap();
        assert!(report.contains("1.00"));
    }
}
