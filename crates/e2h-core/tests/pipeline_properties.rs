//! Property tests for the transformation pipeline.
//!
//! These tests verify:
//! - Output line count equals the number of data rows
//! - Unkeyed output follows input order
//! - Keyed output is the sorted permutation of per-row digests
//! - A different secret changes every keyed output line

use e2h_core::config::{ConfigOptions, RunConfig};
use e2h_core::driver::run_from;
use e2h_core::rows::RowReader;
use e2h_digest::{Algorithm, Digester, Registry, Secret};
use proptest::prelude::*;
use std::io::Cursor;
use std::time::Instant;
use tempfile::TempDir;

fn email() -> impl Strategy<Value = String> {
    "[a-z0-9._]{1,12}@[a-z0-9]{1,8}\\.(com|org)"
}

fn csv(emails: &[String]) -> String {
    let mut input = String::from("id,email,note\n");
    for (i, email) in emails.iter().enumerate() {
        input.push_str(&format!("{},{},n{}\n", i + 1, email, i));
    }
    input
}

fn digester(algorithm: Algorithm, secret: &str) -> Digester {
    let secret = Secret::new(secret).unwrap();
    let key = algorithm.is_keyed().then_some(&secret);
    Registry::standard().build(algorithm, key).unwrap()
}

/// Run the pipeline over `input` and return the output lines.
fn run(dir: &TempDir, input: &str, algorithm: Algorithm, secret: &str) -> (u64, Vec<String>) {
    let config = RunConfig::resolve(
        ConfigOptions {
            input_path: dir.path().join("in.csv"),
            output_path: Some(dir.path().join("out.txt")),
            algorithm: Some(algorithm.to_string()),
            ..Default::default()
        },
        &Registry::standard(),
    )
    .unwrap();
    let rows = RowReader::new(Cursor::new(input.as_bytes().to_vec()), "in.csv");
    let report = run_from(rows, &config, digester(algorithm, secret), Instant::now()).unwrap();
    let lines = std::fs::read_to_string(&config.output_path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (report.rows_processed, lines)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn unkeyed_output_follows_input(emails in prop::collection::vec(email(), 0..24)) {
        let dir = TempDir::new().unwrap();
        for algorithm in [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Blake2s, Algorithm::Blake2b, Algorithm::Sha3_256] {
            let (processed, lines) = run(&dir, &csv(&emails), algorithm, "longenoughsecret");
            prop_assert_eq!(processed as usize, emails.len());

            let mut expected = digester(algorithm, "longenoughsecret");
            let expected: Vec<String> = emails.iter().map(|e| expected.hex_digest(e.as_bytes())).collect();
            prop_assert_eq!(lines, expected);
        }
    }

    #[test]
    fn keyed_output_is_sorted_permutation(emails in prop::collection::vec(email(), 0..24)) {
        let dir = TempDir::new().unwrap();
        let (processed, lines) = run(&dir, &csv(&emails), Algorithm::HmacSha3_256, "longenoughsecret");
        prop_assert_eq!(processed as usize, emails.len());

        let mut mac = digester(Algorithm::HmacSha3_256, "longenoughsecret");
        let mut expected: Vec<String> = emails.iter().map(|e| mac.hex_digest(e.as_bytes())).collect();
        expected.sort();
        prop_assert_eq!(lines, expected);
    }

    #[test]
    fn changing_secret_changes_every_line(emails in prop::collection::vec(email(), 1..12)) {
        let dir = TempDir::new().unwrap();
        let (_, first) = run(&dir, &csv(&emails), Algorithm::HmacSha3_256, "longenoughsecret");
        let (_, second) = run(&dir, &csv(&emails), Algorithm::HmacSha3_256, "anothersecretvalue");
        for line in &first {
            prop_assert!(!second.contains(line));
        }
    }
}
