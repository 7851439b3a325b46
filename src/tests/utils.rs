use crate::db::{init_db, Database};
use crate::domain::columns;
use polars::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

/// Initialize a fresh store under a unique temp path, using the
/// production schema.
pub fn init_test_db(label: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "immoprice_{label}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_str().unwrap());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

/// A raw listings table of `rows` unique house listings in Antwerp
/// (zip 2000), with the price an exact linear function of living area
/// and bedroom count: 1500 * area + 200000 * bedrooms. The other
/// numeric columns vary but carry no signal, and no pair of columns
/// crosses the 0.95 redundancy threshold.
pub fn antwerp_houses(rows: usize) -> DataFrame {
    let idx: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let zip: Vec<i64> = vec![2000; rows];
    let types: Vec<&str> = vec!["house"; rows];
    let locality: Vec<&str> = vec!["Antwerpen"; rows];

    let bedrooms: Vec<f64> = idx.iter().map(|i| 1.0 + (*i as usize % 4) as f64).collect();
    let living: Vec<f64> = idx.iter().map(|i| 80.0 + 10.0 * i).collect();
    let terrace: Vec<f64> = idx.iter().map(|i| (*i as usize % 5) as f64 * 8.0).collect();
    let garden: Vec<f64> = idx.iter().map(|i| (*i as usize % 7) as f64 * 15.0).collect();
    let land: Vec<f64> = idx
        .iter()
        .map(|i| 200.0 + ((*i as usize * 37) % 300) as f64)
        .collect();
    let facades: Vec<f64> = idx.iter().map(|i| 2.0 + (*i as usize % 3) as f64).collect();
    let price: Vec<f64> = living
        .iter()
        .zip(bedrooms.iter())
        .map(|(a, b)| 1500.0 * a + 200_000.0 * b)
        .collect();

    df!(
        columns::LOCALITY => locality,
        columns::ZIP_CODE => zip,
        columns::TYPE_OF_PROPERTY => types,
        columns::NUMBER_OF_BEDROOMS => bedrooms,
        columns::LIVING_AREA => living,
        columns::TERRACE_AREA => terrace,
        columns::GARDEN_AREA => garden,
        columns::SURFACE_OF_LAND => land,
        columns::NUMBER_OF_FACADES => facades,
        columns::PRICE => price,
    )
    .unwrap()
}
