use crate::db::{init_db, Database};
use crate::domain::restrictions::Restrictions;
use crate::errors::AppError;
use crate::model::trainer::TrainConfig;
use crate::pipeline::explore::{correlation_report, Grouping};
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;

mod db;
mod domain;
mod errors;
mod ingest;
mod model;
mod pipeline;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let result = match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("train"), Some(dataset)) => cmd_train(dataset),
        (Some("explore"), Some(dataset)) => cmd_explore(dataset),
        (Some("serve"), _) => cmd_serve(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  immoprice train <csv-path-or-url>    train and store per-segment models");
            eprintln!("  immoprice explore <csv-path-or-url>  print correlation matrices");
            eprintln!("  immoprice serve                      start the prediction API");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn cmd_train(dataset: &str) -> Result<(), AppError> {
    let db = Database::new(db_path());
    init_db(&db)?;

    let raw = ingest::load_table(dataset)?;
    let summary = pipeline::run_training(
        &db,
        &raw,
        &Restrictions::builtin(),
        &TrainConfig::default(),
    )?;

    println!();
    println!(
        "Training complete: {} segments trained, {} failed",
        summary.trained.len(),
        summary.failed.len()
    );
    println!(
        "Rows: {} loaded, {} duplicates removed, {} without a region, {} with an unusable property type",
        summary.rows_loaded,
        summary.duplicates_removed,
        summary.unmapped_zip_rows_removed,
        summary.unknown_property_type_rows
    );
    for report in &summary.trained {
        let best = report.models.iter().min_by(|a, b| {
            a.scores
                .test_mse
                .partial_cmp(&b.scores.test_mse)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(best) = best {
            println!(
                "  {} ({} train / {} test rows, {} features): best model {} with test R^2 {:.2}",
                report.segment,
                report.n_train,
                report.n_test,
                report.feature_names.len(),
                best.kind.label(),
                best.scores.test_r2
            );
        }
    }
    for (segment, reason) in &summary.failed {
        println!("  failed {segment}: {reason}");
    }
    Ok(())
}

fn cmd_explore(dataset: &str) -> Result<(), AppError> {
    let raw = ingest::load_table(dataset)?;
    print!("{}", correlation_report(&raw, Grouping::Community)?);
    print!("{}", correlation_report(&raw, Grouping::Region)?);
    Ok(())
}

fn cmd_serve() -> Result<(), AppError> {
    let db = Database::new(db_path());
    init_db(&db)?;

    let addr: SocketAddr = server_addr()
        .parse()
        .map_err(|e| AppError::InternalError(format!("bad listen address: {e}")))?;
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &db) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    result.map_err(|e| AppError::InternalError(format!("server ended with error: {e}")))?;

    println!("Server shut down cleanly.");
    Ok(())
}

fn db_path() -> String {
    std::env::var("IMMOPRICE_DB").unwrap_or_else(|_| "immoprice.sqlite3".to_string())
}

fn server_addr() -> String {
    std::env::var("IMMOPRICE_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string())
}
