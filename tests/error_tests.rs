use std::path::PathBuf;

use listingintel::{AppError, ImportError};

#[test]
fn test_import_error_display() {
    let error = ImportError::MissingInput(PathBuf::from("dataset_annonces.csv.tar.gz"));
    assert_eq!(
        error.to_string(),
        "File dataset_annonces.csv.tar.gz not found! Please download it from \
         https://storage.googleapis.com/data.meilleurecopro.com/stage/dataset_annonces.csv.tar.gz"
    );

    let error = ImportError::NoDataFileInArchive(PathBuf::from("dump.tar.gz"));
    assert_eq!(error.to_string(), "No CSV file found in archive dump.tar.gz");

    let error = ImportError::BatchWrite {
        batch: 3,
        size: 5000,
        reason: "disk full".to_string(),
    };
    assert_eq!(error.to_string(), "Batch 3 of 5000 listings was discarded: disk full");

    let error = ImportError::FieldCoercion {
        column: "PRICE",
        raw: "abc".to_string(),
    };
    assert_eq!(error.to_string(), "Could not coerce PRICE value \"abc\"");
}

#[test]
fn test_preflight_classification() {
    assert!(ImportError::MissingInput(PathBuf::from("x")).is_preflight());
    assert!(ImportError::NoDataFileInArchive(PathBuf::from("x")).is_preflight());
    assert!(!ImportError::Archive("corrupt".to_string()).is_preflight());
}

#[test]
fn test_app_error_display() {
    let error = AppError::NotFound("department: 13".to_string());
    assert_eq!(error.to_string(), "No data found for department: 13");

    let error = AppError::FetchError("request failed with status: 404 Not Found".to_string());
    assert_eq!(
        error.to_string(),
        "Error fetching data from BienIci: request failed with status: 404 Not Found"
    );

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: AppError = json_err.into();
    assert!(matches!(error, AppError::SerializationError(_)));
}

#[test]
fn test_io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: ImportError = io.into();
    assert_eq!(error.to_string(), "I/O error: denied");
}
