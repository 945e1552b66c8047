// src/ledger.rs
//! Append-only history of generated applications.
//!
//! The ledger owns its SQLite storage exclusively. Records are written once
//! after an application artifact has been saved to disk and are never updated
//! or deleted afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// One entry per generated-and-saved application.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub id: i64,
    pub timestamp: String,
    pub company: String,
    pub position: String,
    pub file_path: String,
}

pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Open (or create) the ledger database at the given path.
    ///
    /// Safe to call repeatedly; the migration is a no-op once the schema
    /// exists and never touches existing rows.
    pub async fn open(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to open ledger database: {}", database_path.display())
        })?;

        let ledger = Self { pool };
        ledger.migrate().await?;
        Ok(ledger)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                company TEXT NOT NULL,
                position TEXT NOT NULL,
                file_path TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create applications table")?;

        Ok(())
    }

    /// Record a generated application. Stamps the current local time and
    /// returns the stored record with its fresh id.
    pub async fn append(
        &self,
        company: &str,
        position: &str,
        file_path: &str,
    ) -> Result<ApplicationRecord> {
        if company.trim().is_empty() {
            anyhow::bail!("Company must not be empty");
        }
        if position.trim().is_empty() {
            anyhow::bail!("Position must not be empty");
        }
        if file_path.trim().is_empty() {
            anyhow::bail!("File path must not be empty");
        }

        // Timezone-naive ISO-8601, microsecond precision, sorts lexicographically.
        let timestamp = chrono::Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO applications (timestamp, company, position, file_path)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&timestamp)
        .bind(company)
        .bind(position)
        .bind(file_path)
        .execute(&self.pool)
        .await
        .context("Failed to record application")?;

        info!("Recorded application: {} - {}", company, position);

        Ok(ApplicationRecord {
            id: result.last_insert_rowid(),
            timestamp,
            company: company.to_string(),
            position: position.to_string(),
            file_path: file_path.to_string(),
        })
    }

    /// Every record, newest first. The id tiebreak keeps insertion order for
    /// records created within the same timestamp granularity.
    pub async fn list_all(&self) -> Result<Vec<ApplicationRecord>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, timestamp, company, position, file_path
            FROM applications
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load application history")?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn fresh_ledger_lists_empty() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(&dir.path().join("history.db")).await.unwrap();

        assert!(ledger.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_round_trips_fields() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(&dir.path().join("history.db")).await.unwrap();

        ledger
            .append("Test Corp", "Software Engineer", "/path/to/file")
            .await
            .unwrap();

        let records = ledger.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Test Corp");
        assert_eq!(records[0].position, "Software Engineer");
        assert_eq!(records[0].file_path, "/path/to/file");
        assert!(!records[0].timestamp.is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_newest_first() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(&dir.path().join("history.db")).await.unwrap();

        for n in 1..=3 {
            ledger
                .append(&format!("Company {}", n), "Engineer", "/tmp/letter.txt")
                .await
                .unwrap();
        }

        let records = ledger.list_all().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].company, "Company 3");
        assert_eq!(records[1].company, "Company 2");
        assert_eq!(records[2].company, "Company 1");
        assert!(records[0].id > records[1].id);
        assert!(records[0].timestamp >= records[1].timestamp);
    }

    #[tokio::test]
    async fn reopen_preserves_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.db");

        let ledger = Ledger::open(&path).await.unwrap();
        ledger
            .append("Test Corp", "Engineer", "/tmp/letter.txt")
            .await
            .unwrap();
        drop(ledger);

        // Re-opening re-runs the migration; existing rows must survive.
        let reopened = Ledger::open(&path).await.unwrap();
        let records = reopened.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Test Corp");
    }

    #[tokio::test]
    async fn append_rejects_empty_fields() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(&dir.path().join("history.db")).await.unwrap();

        assert!(ledger.append("", "Engineer", "/tmp/f").await.is_err());
        assert!(ledger.append("Corp", "  ", "/tmp/f").await.is_err());
        assert!(ledger.append("Corp", "Engineer", "").await.is_err());
        assert!(ledger.list_all().await.unwrap().is_empty());
    }
}
