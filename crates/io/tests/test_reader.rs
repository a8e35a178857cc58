//! Integration test: text signal reading.

use std::fs;
use std::path::Path;

use ecgann_io::{IoError, read_text_signal};

#[test]
fn read_text_signal_file_not_found() {
    let path = Path::new("/tmp/ecgann_test_nonexistent_signal.txt");
    let err = read_text_signal(path, 1).unwrap_err();
    assert!(
        matches!(err, IoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

#[test]
fn read_two_lead_recording() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("rec.txt");
    let rows: String = (0..500)
        .map(|i| format!("{:.4} {:.4}\n", (i as f64 * 0.1).sin(), -(i as f64)))
        .collect();
    fs::write(&path, rows).expect("write fixture");

    let first = read_text_signal(&path, 1).expect("lead 1");
    let second = read_text_signal(&path, 2).expect("lead 2");
    assert_eq!(first.len(), 500);
    assert_eq!(second.len(), 500);
    approx::assert_abs_diff_eq!(first[10], 1.0f64.sin(), epsilon = 1e-4);
    assert_eq!(second[499], -499.0);

    let err = read_text_signal(&path, 3).unwrap_err();
    assert!(matches!(err, IoError::LeadOutOfRange { columns: 2, .. }));
}

#[test]
fn empty_file_is_too_short() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").expect("write fixture");
    let err = read_text_signal(&path, 1).unwrap_err();
    assert!(matches!(err, IoError::TooShort { got: 0, .. }));
}
