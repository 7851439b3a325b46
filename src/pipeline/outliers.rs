// src/pipeline/outliers.rs

use crate::domain::columns;
use crate::domain::property::Segment;
use crate::domain::restrictions::Restrictions;
use crate::errors::AppError;
use polars::prelude::*;

/// Removes implausible listings from a segment table using the static
/// ceiling table. A segment without an entry passes through unchanged.
/// Rows are kept when living area <= ceiling AND price <= ceiling; both
/// bounds are inclusive. Runs before the feature/target split, never
/// after.
pub fn filter(
    df: &DataFrame,
    segment: &Segment,
    restrictions: &Restrictions,
) -> Result<DataFrame, AppError> {
    let Some(restriction) = restrictions.get(segment) else {
        return Ok(df.clone());
    };

    let living_area = column_as_f64(df, columns::LIVING_AREA)?;
    let price = column_as_f64(df, columns::PRICE)?;

    let keep: Vec<bool> = living_area
        .iter()
        .zip(price.iter())
        .map(|(&area, &price)| {
            area <= restriction.max_living_area && price <= restriction.max_price
        })
        .collect();

    let mask = BooleanChunked::from_slice("keep", &keep);
    df.filter(&mask)
        .map_err(|e| AppError::DataError(e.to_string()))
}

fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>, AppError> {
    let casted = df
        .column(name)
        .map_err(|e| AppError::DataError(format!("missing column '{name}': {e}")))?
        .cast(&DataType::Float64)
        .map_err(|e| AppError::DataError(e.to_string()))?;
    let ca = casted
        .f64()
        .map_err(|e| AppError::DataError(e.to_string()))?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::Region;
    use crate::domain::property::PropertyType;

    fn segment_df(areas: &[f64], prices: &[f64]) -> DataFrame {
        df!(
            columns::LIVING_AREA => areas,
            columns::PRICE => prices,
        )
        .unwrap()
    }

    #[test]
    fn ceiling_bounds_are_inclusive() {
        // (apartment, East Flanders): living area <= 300, price <= 600000.
        let segment = Segment::new(PropertyType::Apartment, Region::EastFlanders);
        let df = segment_df(&[301.0, 300.0, 299.0], &[500_000.0, 600_000.0, 600_001.0]);

        let filtered = filter(&df, &segment, &Restrictions::builtin()).unwrap();
        assert_eq!(filtered.height(), 1);

        let areas = filtered.column(columns::LIVING_AREA).unwrap();
        assert_eq!(areas.f64().unwrap().get(0), Some(300.0));
    }

    #[test]
    fn both_conditions_must_hold() {
        let segment = Segment::new(PropertyType::Apartment, Region::EastFlanders);
        // Fine living area but excessive price, and vice versa.
        let df = segment_df(&[100.0, 400.0], &[700_000.0, 100_000.0]);
        let filtered = filter(&df, &segment, &Restrictions::builtin()).unwrap();
        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn unrestricted_segment_passes_through() {
        let segment = Segment::new(PropertyType::Apartment, Region::Antwerp);
        let df = segment_df(&[2_000.0], &[99_000_000.0]);
        let filtered = filter(&df, &segment, &Restrictions::builtin()).unwrap();
        assert_eq!(filtered.height(), 1);
    }
}
