//! End-to-end tests: generate a fixture dataset, filter it by tenure and
//! inspect the CSV that lands in storage.

use anniversary::{generate_fixtures, handle_tenure_request, FixtureRequest, TenureResponse};
use anniversary_core::tenure_in_years;
use anniversary_handlers::INVALID_TENURE_MESSAGE;
use anniversary_writer::{Location, StorageClient};
use arrow::array::{Array, Date32Array, StringArray};
use arrow::datatypes::Date32Type;
use chrono::{Datelike, Utc};
use serde_json::{json, Value};

const SOURCE_BUCKET: &str = "fixtures";
const SOURCE_KEY: &str = "sample.parquet";

fn current_year() -> i32 {
    Utc::now().year()
}

async fn seeded_store(storage: &StorageClient, num_rows: usize) {
    let request = FixtureRequest {
        bucket: SOURCE_BUCKET.to_string(),
        key: SOURCE_KEY.to_string(),
        num_rows,
        seed: Some(2024),
    };
    let summary = generate_fixtures(storage, &request).await.unwrap();
    assert_eq!(summary.row_count, num_rows);
}

fn payload(tenure_years: Value, destination_path: &str) -> Value {
    json!({
        "tenure_years": tenure_years,
        "source_bucket": SOURCE_BUCKET,
        "source_key": SOURCE_KEY,
        "destination_path": destination_path,
    })
}

async fn read_csv(storage: &StorageClient, location: &Location) -> String {
    let bytes = storage.read_bytes(location).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Expected CSV data lines, computed directly from the source dataset
async fn expected_lines(storage: &StorageClient, tenure_years: i64) -> Vec<String> {
    let today = Utc::now().date_naive();
    let dataset = storage
        .read_dataset(&Location::new(SOURCE_BUCKET, SOURCE_KEY))
        .await
        .unwrap();

    let column = |name: &str| dataset.column_by_name(name).unwrap().clone();
    let names = column("name");
    let names = names.as_any().downcast_ref::<StringArray>().unwrap();
    let dates = column("start_date");
    let dates = dates.as_any().downcast_ref::<Date32Array>().unwrap();
    let departments = column("department");
    let departments = departments.as_any().downcast_ref::<StringArray>().unwrap();
    let roles = column("role");
    let roles = roles.as_any().downcast_ref::<StringArray>().unwrap();

    (0..dataset.num_rows())
        .filter(|&i| !dates.is_null(i))
        .filter_map(|i| {
            let start = Date32Type::to_naive_date(dates.value(i));
            (tenure_in_years(start, today) == tenure_years).then(|| {
                format!(
                    "{},{},{},{}",
                    names.value(i),
                    start.format("%Y-%m-%d"),
                    departments.value(i),
                    roles.value(i)
                )
            })
        })
        .collect()
}

#[tokio::test]
async fn test_longest_tenure_finds_rows() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 500).await;

    let tenure = current_year() - 1990;
    let response = handle_tenure_request(&storage, &payload(json!(tenure), "s3://output/1990.csv")).await;

    let row_count = response.row_count().expect("success envelope");
    assert!(row_count >= 1, "expected at least one 1990 starter");
}

#[tokio::test]
async fn test_output_matches_source_rows() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 500).await;

    let tenure = i64::from(current_year() - 2005);
    let response = handle_tenure_request(&storage, &payload(json!(tenure), "output/2005.csv")).await;
    let expected = expected_lines(&storage, tenure).await;

    assert_eq!(response, TenureResponse::done("output/2005.csv", expected.len()));

    let csv = read_csv(&storage, &Location::new("output", "2005.csv")).await;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("name,start_date,department,role"));
    let actual: Vec<String> = lines.map(str::to_string).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 500).await;

    let request = payload(json!(current_year() - 2010), "s3://output/repeat.csv");
    let destination = Location::new("output", "repeat.csv");

    let first = handle_tenure_request(&storage, &request).await;
    let first_csv = read_csv(&storage, &destination).await;
    let second = handle_tenure_request(&storage, &request).await;
    let second_csv = read_csv(&storage, &destination).await;

    assert!(first.is_success());
    assert_eq!(first, second);
    assert_eq!(first_csv, second_csv);
}

#[tokio::test]
async fn test_zero_matches_writes_header_only() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 200).await;

    let response = handle_tenure_request(&storage, &payload(json!(0), "s3://output/none.csv")).await;
    assert_eq!(response, TenureResponse::done("s3://output/none.csv", 0));

    let csv = read_csv(&storage, &Location::new("output", "none.csv")).await;
    assert_eq!(csv.trim_end(), "name,start_date,department,role");
}

#[tokio::test]
async fn test_missing_destination_path() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 10).await;

    let mut request = payload(json!(5), "unused/out.csv");
    request.as_object_mut().unwrap().remove("destination_path");

    let response = handle_tenure_request(&storage, &request).await;
    let envelope: Value = serde_json::from_str(&response.to_json()).unwrap();
    let message = envelope["error_message"].as_str().unwrap();
    assert!(message.contains("destination_path"));
    assert!(envelope.get("status").is_none());
}

#[tokio::test]
async fn test_non_numeric_tenure() {
    let storage = StorageClient::memory().unwrap();
    seeded_store(&storage, 10).await;

    let response = handle_tenure_request(&storage, &payload(json!("abc"), "s3://output/x.csv")).await;
    assert_eq!(response, TenureResponse::error(INVALID_TENURE_MESSAGE));
}

#[tokio::test]
async fn test_missing_source_object() {
    let storage = StorageClient::memory().unwrap();

    let response = handle_tenure_request(&storage, &payload(json!(5), "s3://output/x.csv")).await;
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_filesystem_backend_layout() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageClient::fs(&dir.path().to_string_lossy()).unwrap();
    seeded_store(&storage, 100).await;

    assert!(dir.path().join(SOURCE_BUCKET).join(SOURCE_KEY).is_file());

    let tenure = current_year() - 2000;
    let response = handle_tenure_request(&storage, &payload(json!(tenure), "s3://results/2000.csv")).await;
    assert!(response.is_success());

    let written = std::fs::read_to_string(dir.path().join("results").join("2000.csv")).unwrap();
    assert_eq!(
        written.lines().count(),
        response.row_count().unwrap() + 1,
        "header plus one line per match"
    );
}

#[tokio::test]
async fn test_filesystem_requests_stay_inside_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");
    let storage = StorageClient::fs(&root.to_string_lossy()).unwrap();
    seeded_store(&storage, 50).await;

    let response = handle_tenure_request(&storage, &payload(json!(10), "../escaped.csv")).await;
    assert!(!response.is_success());
    assert!(!dir.path().join("escaped.csv").exists());

    let outside = json!({
        "tenure_years": 10,
        "source_bucket": "..",
        "source_key": "store/fixtures/sample.parquet",
        "destination_path": "output/out.csv",
    });
    let response = handle_tenure_request(&storage, &outside).await;
    match response {
        TenureResponse::Error { error_message } => {
            assert!(error_message.starts_with("source_bucket is invalid"));
        }
        other => panic!("expected error envelope, got {:?}", other),
    }
    assert!(!root.join("output").exists());
}
