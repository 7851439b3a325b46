pub mod connection;
pub mod models;

pub use connection::{init_db, Database};
