//! Integration tests — normalize → validate → persist flows and on-disk
//! store round-trips.

use tempfile::tempdir;

use triage_core::config::PersistenceConfig;
use triage_core::normalize::normalize;
use triage_core::persistence::{FeedbackStore, HistoryFilter, SqliteStore};
use triage_core::types::FeedbackCategory;
use triage_core::validate::validate;

// ---------------------------------------------------------------------------
// Normalize → validate → persist, without the classifier in the loop
// ---------------------------------------------------------------------------

#[test]
fn validated_result_persists_and_reads_back() {
    let normalized = normalize("  The   export  button\tdoes nothing  ").expect("valid input");
    assert_eq!(normalized, "The export button does nothing");

    let raw = r#"Sure! {"category": "Bug Report", "urgency_score": 3} — done."#;
    let result = validate(raw, &normalized).expect("valid classification");

    let store = SqliteStore::open_in_memory().expect("open");
    let record = store
        .create_feedback_record(&result, Some("203.0.113.9"), Some(512.25))
        .expect("persist");

    assert_eq!(record.feedback_text, "The export button does nothing");
    assert_eq!(record.category, FeedbackCategory::BugReport);
    assert_eq!(record.urgency_score.get(), 3);

    let history = store
        .feedback_history(&HistoryFilter::default())
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);
    assert_eq!(history[0].client_ip.as_deref(), Some("203.0.113.9"));
}

// ---------------------------------------------------------------------------
// File-backed store survives reopen
// ---------------------------------------------------------------------------

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("feedback.db");
    let config = PersistenceConfig::default();

    {
        let store = SqliteStore::open(&db_path, &config).expect("open");
        let result = validate(
            r#"{"category": "Feature Request", "urgency_score": 2}"#,
            "add keyboard shortcuts",
        )
        .expect("valid classification");
        store
            .create_feedback_record(&result, None, Some(99.0))
            .expect("persist");
    }

    let reopened = SqliteStore::open(&db_path, &config).expect("reopen");
    let history = reopened
        .feedback_history(&HistoryFilter::default())
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].feedback_text, "add keyboard shortcuts");
    assert_eq!(history[0].category, FeedbackCategory::FeatureRequest);
}

#[test]
fn file_backed_store_works_without_wal() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("feedback.db");
    let config = PersistenceConfig {
        wal_mode: false,
        ..PersistenceConfig::default()
    };

    let store = SqliteStore::open(&db_path, &config).expect("open");
    let result = validate(
        r#"{"category": "General Inquiry", "urgency_score": 1}"#,
        "where are my settings",
    )
    .expect("valid classification");
    store
        .create_feedback_record(&result, None, None)
        .expect("persist");

    let stats = store.dashboard_stats(30).expect("stats");
    assert_eq!(stats.total_feedback, 1);
}
