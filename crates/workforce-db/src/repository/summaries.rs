//! Daily summary operations

use chrono::{NaiveDate, Utc};
use sqlx::Row;

use crate::error::DbError;
use crate::models::{DailySummary, UpsertOutcome};
use crate::repository::Database;
use crate::utils::format_date;

impl Database {
    // ==================== Daily Summary Operations ====================

    /// Insert or overwrite the headcount for one (date, department) pair
    ///
    /// The lookup and the write share one transaction.
    pub async fn upsert_daily_summary(
        &self,
        summary_date: NaiveDate,
        department_id: i64,
        employee_count: i64,
    ) -> Result<(DailySummary, UpsertOutcome), DbError> {
        let now = Utc::now();
        let date = format_date(summary_date);

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(
            r#"
            SELECT id FROM daily_summaries
            WHERE summary_date = ? AND department_id = ?
            "#,
        )
        .bind(&date)
        .bind(department_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (id, outcome) = match existing {
            Some(row) => {
                let id: i64 = row.get("id");
                sqlx::query(
                    r#"
                    UPDATE daily_summaries
                    SET employee_count = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(employee_count)
                .bind(now.to_rfc3339())
                .bind(id)
                .execute(&mut *tx)
                .await?;
                (id, UpsertOutcome::Updated)
            }
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO daily_summaries (summary_date, department_id, employee_count, updated_at)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(&date)
                .bind(department_id)
                .bind(employee_count)
                .bind(now.to_rfc3339())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    DbError::from_constraint(
                        e,
                        format!("Summary for department {} on {}", department_id, date),
                    )
                })?;
                (row.get("id"), UpsertOutcome::Created)
            }
        };

        tx.commit().await?;

        Ok((
            DailySummary {
                id,
                summary_date,
                department_id,
                employee_count,
                updated_at: now,
            },
            outcome,
        ))
    }

    /// Get the summary for one (date, department) pair
    pub async fn get_daily_summary(
        &self,
        summary_date: NaiveDate,
        department_id: i64,
    ) -> Result<Option<DailySummary>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, summary_date, department_id, employee_count, updated_at
            FROM daily_summaries
            WHERE summary_date = ? AND department_id = ?
            "#,
        )
        .bind(format_date(summary_date))
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| DailySummary::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all summaries recorded for a date
    pub async fn list_daily_summaries(&self, summary_date: NaiveDate) -> Result<Vec<DailySummary>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, summary_date, department_id, employee_count, updated_at
            FROM daily_summaries
            WHERE summary_date = ?
            ORDER BY department_id
            "#,
        )
        .bind(format_date(summary_date))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| DailySummary::try_from(row).map_err(DbError::from))
            .collect()
    }
}
