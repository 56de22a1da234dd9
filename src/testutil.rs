//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fmt::Write;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::conf::Config;
use crate::service::CsvqlService;

/// RNG seed for deterministic data generation
pub const RNG_SEED: u64 = 42;

/// The two-row upload used throughout the docs and tests.
pub const PEOPLE_CSV: &[u8] = b"id,name\n1,Alice\n2,Bob\n";

const NAMES: &[&str] = &["Alice", "Bob", "Carol", "Dave", "Eve", "Mallory", "Trent"];
const CITIES: &[&str] = &["Berlin", "Lisbon", "Oslo", "Porto", "Quebec, QC"];

/// Generate a deterministic CSV with columns `id,name,city,score,active`.
///
/// - `id` is the row index (0, 1, 2, ...)
/// - `name` and `city` are drawn from fixed lists (`city` sometimes needs quoting)
/// - `score` is a float with two decimals in [0, 100)
/// - `active` is true for odd ids
pub fn generate_csv(num_rows: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let mut out = String::from("id,name,city,score,active\n");
    for i in 0..num_rows {
        let name = NAMES[rng.gen_range(0..NAMES.len())];
        let city = CITIES[rng.gen_range(0..CITIES.len())];
        let score = f64::from(rng.gen_range(0..10_000u32)) / 100.0;
        let city = if city.contains(',') {
            format!("\"{city}\"")
        } else {
            city.to_string()
        };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{i},{name},{city},{score:.2},{}", i % 2 == 1);
    }
    out.into_bytes()
}

/// A service with default config and one session holding `people.csv`.
pub async fn setup_people_session() -> (CsvqlService, String) {
    let service = CsvqlService::new(Config::default());
    let session_id = service.create_session().await;
    service
        .upload(&session_id, PEOPLE_CSV, "people.csv")
        .await
        .unwrap();
    (service, session_id)
}

/// Write `toml` to a config file inside a fresh temp dir.
/// Keep the returned dir alive for as long as the file is needed.
pub fn write_config(toml: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("csvql.toml");
    std::fs::write(&path, toml).unwrap();
    (dir, path)
}
