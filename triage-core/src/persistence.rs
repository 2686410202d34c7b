//! SQLite storage collaborator for triage results.
//!
//! The pipeline only requires the [`FeedbackStore`] contract; the dashboard
//! read surface (history, search, aggregate statistics) lives on the same
//! trait because it consumes the records this module writes. The schema is
//! intentionally simple:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS feedback_records (
//!     id                 INTEGER PRIMARY KEY AUTOINCREMENT,
//!     feedback_text      TEXT NOT NULL,
//!     category           TEXT NOT NULL,
//!     urgency_score      INTEGER NOT NULL,
//!     client_ip          TEXT,
//!     processing_time_ms REAL,
//!     created_at         TEXT NOT NULL
//! );
//! ```
//!
//! WAL mode keeps dashboard reads from blocking triage writes. Timestamps
//! are RFC 3339 UTC strings, so lexicographic comparison matches time order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row, ToSql, params, params_from_iter};
use serde::Serialize;
use tracing::info;

use crate::config::PersistenceConfig;
use crate::error::Result;
use crate::types::{FeedbackCategory, FeedbackRecord, TriageResult, UrgencyScore};

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Storage collaborator contract required by the triage pipeline.
///
/// `create_feedback_record` is the only operation the pipeline itself calls;
/// the rest is the read surface consumed by the dashboard layer.
pub trait FeedbackStore: Send + Sync {
    /// Persist a validated triage result.
    ///
    /// # Errors
    /// Returns a database error on failure; the pipeline logs and continues.
    fn create_feedback_record(
        &self,
        result: &TriageResult,
        client_ip: Option<&str>,
        processing_time_ms: Option<f64>,
    ) -> Result<FeedbackRecord>;

    /// Newest-first feedback history with optional filters and pagination.
    ///
    /// # Errors
    /// Returns a database error on failure.
    fn feedback_history(&self, filter: &HistoryFilter) -> Result<Vec<FeedbackRecord>>;

    /// Case-insensitive substring search over feedback text, newest first.
    ///
    /// # Errors
    /// Returns a database error on failure.
    fn search_feedback(&self, term: &str, limit: u32) -> Result<Vec<FeedbackRecord>>;

    /// Aggregate statistics over the trailing `days_back` days.
    ///
    /// # Errors
    /// Returns a database error on failure.
    fn dashboard_stats(&self, days_back: u32) -> Result<DashboardStats>;
}

/// Filters for [`FeedbackStore::feedback_history`].
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// Maximum records returned.
    pub limit: u32,
    /// Records skipped before the first returned one.
    pub offset: u32,
    /// Only this category, when set.
    pub category: Option<FeedbackCategory>,
    /// Minimum urgency, inclusive.
    pub urgency_min: Option<u8>,
    /// Maximum urgency, inclusive.
    pub urgency_max: Option<u8>,
    /// Only records from the trailing N days.
    pub days_back: Option<u32>,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            category: None,
            urgency_min: None,
            urgency_max: None,
            days_back: None,
        }
    }
}

/// Count of records for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    /// The category.
    pub category: FeedbackCategory,
    /// Number of records.
    pub count: u64,
}

/// Count of records for one urgency score.
#[derive(Debug, Clone, Serialize)]
pub struct UrgencyCount {
    /// The urgency score.
    pub urgency_score: UrgencyScore,
    /// Number of records.
    pub count: u64,
}

/// Count of records for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    /// UTC date, `YYYY-MM-DD`.
    pub date: String,
    /// Number of records.
    pub count: u64,
}

/// Aggregate dashboard statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Total records in the window.
    pub total_feedback: u64,
    /// Per-category counts.
    pub category_distribution: Vec<CategoryCount>,
    /// Per-urgency counts.
    pub urgency_distribution: Vec<UrgencyCount>,
    /// Mean processing time over records that have one, rounded to 2 dp.
    pub avg_processing_time_ms: f64,
    /// Records per day over the last 7 days.
    pub daily_trend: Vec<DailyCount>,
    /// Up to 5 most urgent recent records (urgency ≥ 4).
    pub urgent_feedback: Vec<FeedbackRecord>,
    /// Window length the stats cover.
    pub time_period_days: u32,
}

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS feedback_records (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    feedback_text      TEXT NOT NULL,
    category           TEXT NOT NULL,
    urgency_score      INTEGER NOT NULL,
    client_ip          TEXT,
    processing_time_ms REAL,
    created_at         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_category          ON feedback_records (category);
CREATE INDEX IF NOT EXISTS idx_urgency           ON feedback_records (urgency_score);
CREATE INDEX IF NOT EXISTS idx_created           ON feedback_records (created_at);
CREATE INDEX IF NOT EXISTS idx_category_urgency  ON feedback_records (category, urgency_score);
CREATE INDEX IF NOT EXISTS idx_created_urgency   ON feedback_records (created_at, urgency_score);
CREATE INDEX IF NOT EXISTS idx_category_created  ON feedback_records (category, created_at);
";

/// SQLite-backed [`FeedbackStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// The schema is created if missing. WAL mode is enabled when
    /// `config.wal_mode` is true.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TriageError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch(&format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms))?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "feedback store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Open an in-memory database. Useful for tests.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TriageError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    let category_str: String = row.get(2)?;
    let category = category_str
        .parse::<FeedbackCategory>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;

    let urgency_raw: i64 = row.get(3)?;
    let urgency_score = UrgencyScore::try_from(urgency_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, e.into()))?;

    let created_raw: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(FeedbackRecord {
        id: row.get(0)?,
        feedback_text: row.get(1)?,
        category,
        urgency_score,
        client_ip: row.get(4)?,
        processing_time_ms: row.get(5)?,
        created_at,
    })
}

const SELECT_COLUMNS: &str =
    "id, feedback_text, category, urgency_score, client_ip, processing_time_ms, created_at";

fn cutoff_rfc3339(days_back: u32) -> String {
    (Utc::now() - Duration::days(i64::from(days_back))).to_rfc3339()
}

impl FeedbackStore for SqliteStore {
    fn create_feedback_record(
        &self,
        result: &TriageResult,
        client_ip: Option<&str>,
        processing_time_ms: Option<f64>,
    ) -> Result<FeedbackRecord> {
        let created_at = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO feedback_records
             (feedback_text, category, urgency_score, client_ip, processing_time_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                result.feedback_text,
                result.category.as_str(),
                i64::from(result.urgency_score.get()),
                client_ip,
                processing_time_ms,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(FeedbackRecord {
            id: conn.last_insert_rowid(),
            feedback_text: result.feedback_text.clone(),
            category: result.category,
            urgency_score: result.urgency_score,
            client_ip: client_ip.map(ToString::to_string),
            processing_time_ms,
            created_at,
        })
    }

    fn feedback_history(&self, filter: &HistoryFilter) -> Result<Vec<FeedbackRecord>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(category) = filter.category {
            conditions.push("category = ?");
            values.push(Box::new(category.as_str()));
        }
        if let Some(min) = filter.urgency_min {
            conditions.push("urgency_score >= ?");
            values.push(Box::new(i64::from(min)));
        }
        if let Some(max) = filter.urgency_max {
            conditions.push("urgency_score <= ?");
            values.push(Box::new(i64::from(max)));
        }
        if let Some(days) = filter.days_back {
            conditions.push("created_at >= ?");
            values.push(Box::new(cutoff_rfc3339(days)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM feedback_records {where_clause}
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        values.push(Box::new(i64::from(filter.limit)));
        values.push(Box::new(i64::from(filter.offset)));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(values.iter().map(|v| v.as_ref())),
            row_to_record,
        )?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn search_feedback(&self, term: &str, limit: u32) -> Result<Vec<FeedbackRecord>> {
        let pattern = format!("%{term}%");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM feedback_records
             WHERE feedback_text LIKE ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![pattern, i64::from(limit)], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn dashboard_stats(&self, days_back: u32) -> Result<DashboardStats> {
        let cutoff = cutoff_rfc3339(days_back);
        let conn = self.conn.lock();

        let total_feedback: u64 = conn.query_row(
            "SELECT COUNT(*) FROM feedback_records WHERE created_at >= ?1",
            params![cutoff],
            |row| row.get::<_, i64>(0),
        )? as u64;

        let mut category_distribution = Vec::new();
        {
            let mut stmt = conn.prepare(
                "SELECT category, COUNT(*) FROM feedback_records
                 WHERE created_at >= ?1 GROUP BY category",
            )?;
            let rows = stmt.query_map(params![cutoff], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (name, count) = row?;
                if let Ok(category) = name.parse::<FeedbackCategory>() {
                    category_distribution.push(CategoryCount {
                        category,
                        count: count as u64,
                    });
                }
            }
        }

        let mut urgency_distribution = Vec::new();
        {
            let mut stmt = conn.prepare(
                "SELECT urgency_score, COUNT(*) FROM feedback_records
                 WHERE created_at >= ?1 GROUP BY urgency_score ORDER BY urgency_score",
            )?;
            let rows = stmt.query_map(params![cutoff], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (score, count) = row?;
                if let Ok(urgency_score) = UrgencyScore::try_from(score) {
                    urgency_distribution.push(UrgencyCount {
                        urgency_score,
                        count: count as u64,
                    });
                }
            }
        }

        let avg_processing_time_ms: f64 = conn
            .query_row(
                "SELECT AVG(processing_time_ms) FROM feedback_records
                 WHERE created_at >= ?1 AND processing_time_ms IS NOT NULL",
                params![cutoff],
                |row| row.get::<_, Option<f64>>(0),
            )?
            .unwrap_or(0.0);
        let avg_processing_time_ms = (avg_processing_time_ms * 100.0).round() / 100.0;

        // Daily trend always covers the trailing 7 days regardless of the
        // stats window. BTreeMap keeps the dates sorted.
        let mut daily: BTreeMap<String, u64> = BTreeMap::new();
        {
            let week_cutoff = cutoff_rfc3339(7);
            let mut stmt = conn.prepare(
                "SELECT substr(created_at, 1, 10) AS day, COUNT(*)
                 FROM feedback_records WHERE created_at >= ?1 GROUP BY day",
            )?;
            let rows = stmt.query_map(params![week_cutoff], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (date, count) = row?;
                daily.insert(date, count as u64);
            }
        }
        let daily_trend = daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        let mut urgent_feedback = Vec::new();
        {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM feedback_records
                 WHERE created_at >= ?1 AND urgency_score >= 4
                 ORDER BY urgency_score DESC, created_at DESC, id DESC LIMIT 5"
            ))?;
            let rows = stmt.query_map(params![cutoff], row_to_record)?;
            for row in rows {
                urgent_feedback.push(row?);
            }
        }

        Ok(DashboardStats {
            total_feedback,
            category_distribution,
            urgency_distribution,
            avg_processing_time_ms,
            daily_trend,
            urgent_feedback,
            time_period_days: days_back,
        })
    }
}
