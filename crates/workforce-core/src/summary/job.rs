//! Daily summary aggregation job

use std::collections::HashMap;

use chrono::NaiveDate;
use metrics::counter;
use tracing::{debug, info, warn};
use workforce_db::{DailySummary, Database, UpsertOutcome};

use crate::error::CoreError;

/// Counts from one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryRunReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Stored summary joined with its department name
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub summary: DailySummary,
    pub department_name: String,
}

/// Records the employee headcount of every department for a date
pub struct DailySummaryJob {
    db: Database,
}

impl DailySummaryJob {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Aggregate headcounts for `date`
    ///
    /// Each department is upserted on its own; a failed department is
    /// logged and counted in the report while the rest carry on. Running
    /// twice for the same date leaves one summary per department.
    pub async fn run(&self, date: NaiveDate) -> Result<SummaryRunReport, CoreError> {
        info!("Running daily summary for {}", date);

        let (departments, counts) = match self.load_population().await {
            Ok(population) => population,
            Err(e) => {
                counter!("workforce_daily_summary_runs_total", "outcome" => "failure").increment(1);
                return Err(e);
            }
        };

        let mut report = SummaryRunReport::default();

        for (department_id, department_name) in departments {
            let count = counts.get(&department_id).copied().unwrap_or(0);

            match self.db.upsert_daily_summary(date, department_id, count).await {
                Ok((_, UpsertOutcome::Created)) => report.created += 1,
                Ok((_, UpsertOutcome::Updated)) => report.updated += 1,
                Err(e) => {
                    warn!(
                        "Failed to record summary for department {} on {}: {}",
                        department_name, date, e
                    );
                    report.failed += 1;
                    continue;
                }
            }
            debug!("Department {} has {} employee(s)", department_name, count);
        }

        let outcome = if report.failed == 0 { "success" } else { "partial" };
        counter!("workforce_daily_summary_runs_total", "outcome" => outcome).increment(1);

        info!(
            "Daily summary for {} complete: {} created, {} updated, {} failed",
            date, report.created, report.updated, report.failed
        );

        Ok(report)
    }

    async fn load_population(&self) -> Result<(Vec<(i64, String)>, HashMap<i64, i64>), CoreError> {
        let departments = self
            .db
            .list_departments()
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();
        let counts = self.db.count_employees_by_department().await?;
        Ok((departments, counts))
    }

    /// Summaries stored for `date`, ordered by department
    pub async fn summaries_for(&self, date: NaiveDate) -> Result<Vec<SummaryRecord>, CoreError> {
        let names: HashMap<i64, String> = self
            .db
            .list_departments()
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let summaries = self.db.list_daily_summaries(date).await?;

        Ok(summaries
            .into_iter()
            .map(|summary| SummaryRecord {
                department_name: names
                    .get(&summary.department_id)
                    .cloned()
                    .unwrap_or_default(),
                summary,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_employee, temp_db};
    use workforce_db::Role;

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let (db, _dir) = temp_db().await;
        let alice = seed_employee(&db, "alice@x.com", "p", Role::User).await;
        seed_employee(&db, "bob@x.com", "p", Role::User).await;
        let empty = db.insert_department("Empty").await.unwrap();
        let job = DailySummaryJob::new(db.clone());
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

        let first = job.run(date).await.unwrap();
        assert_eq!(first, SummaryRunReport { created: 2, updated: 0, failed: 0 });

        let second = job.run(date).await.unwrap();
        assert_eq!(second, SummaryRunReport { created: 0, updated: 2, failed: 0 });

        let records = job.summaries_for(date).await.unwrap();
        assert_eq!(records.len(), 2);

        let seeded = records
            .iter()
            .find(|r| r.summary.department_id == alice.department_id)
            .unwrap();
        assert_eq!(seeded.summary.employee_count, 2);

        let idle = records
            .iter()
            .find(|r| r.summary.department_id == empty.id)
            .unwrap();
        assert_eq!(idle.summary.employee_count, 0);
        assert_eq!(idle.department_name, "Empty");
    }

    #[tokio::test]
    async fn test_run_tracks_population_changes() {
        let (db, _dir) = temp_db().await;
        let alice = seed_employee(&db, "alice@x.com", "p", Role::User).await;
        let bob = seed_employee(&db, "bob@x.com", "p", Role::User).await;
        let job = DailySummaryJob::new(db.clone());
        let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();

        job.run(date).await.unwrap();
        db.delete_employee(bob.id).await.unwrap();
        job.run(date).await.unwrap();

        let summary = db
            .get_daily_summary(date, alice.department_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.employee_count, 1);
    }

    #[tokio::test]
    async fn test_run_without_departments() {
        let (db, _dir) = temp_db().await;
        let job = DailySummaryJob::new(db);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert_eq!(job.run(date).await.unwrap(), SummaryRunReport::default());
        assert!(job.summaries_for(date).await.unwrap().is_empty());
    }
}
