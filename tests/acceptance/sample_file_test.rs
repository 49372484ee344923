//! Sample file acceptance tests.
//!
//! Sample histories exported to disk (JSON or TOML) must load into a
//! source that answers exactly like the in-memory original.

use super::common::{history, shuffled_history, to_json, HISTORY_LEN};
use clock_common::{load_samples, validate_sequence, ClockError};
use clock_estimator::{estimate, SortedSamples};
use std::io::Write;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_json_file_round_trip() {
    let file = write_temp(".json", &to_json(&shuffled_history()));
    let loaded = load_samples(file.path()).unwrap();
    assert_eq!(loaded.len(), HISTORY_LEN);

    let from_disk = SortedSamples::new(loaded);
    let in_memory = SortedSamples::new(history());
    assert_eq!(from_disk.as_slice(), in_memory.as_slice());
    for target in (1_000_000..1_200_000).step_by(4_999) {
        assert_eq!(
            estimate(target, &from_disk).unwrap(),
            estimate(target, &in_memory).unwrap()
        );
    }
}

#[test]
fn test_toml_file() {
    let mut toml = String::new();
    for sample in history().iter().take(3) {
        toml.push_str(&format!(
            "[[samples]]\ncounter = {}\ntime = \"{}\"\n\n",
            sample.counter,
            sample.time.to_rfc3339()
        ));
    }
    let file = write_temp(".toml", &toml);
    let loaded = load_samples(file.path()).unwrap();
    assert_eq!(loaded, history()[..3].to_vec());
}

#[test]
fn test_loaded_history_validates() {
    let file = write_temp(".json", &to_json(&history()));
    let loaded = load_samples(file.path()).unwrap();
    assert!(validate_sequence(&loaded).is_ok());

    // File order is not counter order.
    let file = write_temp(".json", &to_json(&shuffled_history()));
    let loaded = load_samples(file.path()).unwrap();
    assert!(matches!(
        validate_sequence(&loaded),
        Err(ClockError::InvalidSample { .. })
    ));
    let sorted = SortedSamples::new(loaded);
    assert!(validate_sequence(sorted.as_slice()).is_ok());
}

#[test]
fn test_corrupt_file_reports_path() {
    let file = write_temp(".json", "{\"samples\": [{\"counter\": -1}]}");
    match load_samples(file.path()) {
        Err(ClockError::SampleFile { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected SampleFile error, got {other:?}"),
    }
}
