//! Wall-clock scheduling for the daily summary job

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::job::DailySummaryJob;

/// A fixed local time of day at which the job fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Parse an `HH:MM` time of day
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M").map(Self::new)
    }

    pub fn time(&self) -> NaiveTime {
        self.at
    }

    /// First fire time strictly after `now`
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }

    /// Next fire instant strictly after `after`
    pub fn fire_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = after.timezone();
        let mut next = self.next_fire_after(after.naive_local());

        // A fire time inside a DST gap does not exist locally; try the next day
        loop {
            match tz.from_local_datetime(&next).earliest() {
                Some(at) => return at,
                None => next += Duration::days(1),
            }
        }
    }

    /// Next fire instant, never at or before `last_fire`
    ///
    /// After a monotonic sleep the wall clock can still read just before the
    /// slot that was served.
    pub fn next_fire<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        last_fire: Option<&DateTime<Tz>>,
    ) -> DateTime<Tz> {
        match last_fire {
            Some(last) if last > now => self.fire_after(last),
            _ => self.fire_after(now),
        }
    }

    /// How long to sleep from `now` until the next fire
    pub fn delay_from<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> std::time::Duration {
        delay_until(now, &self.fire_after(now))
    }
}

fn delay_until<Tz: TimeZone>(now: &DateTime<Tz>, fire_at: &DateTime<Tz>) -> std::time::Duration {
    (fire_at.naive_utc() - now.naive_utc())
        .to_std()
        .unwrap_or(std::time::Duration::ZERO)
}

impl Default for DailySchedule {
    /// 09:00 local time
    fn default() -> Self {
        Self::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

/// Spawn the task that runs the job once a day
///
/// Runs are sequential on a single task, so they never overlap. When a run
/// overruns its slot the next fire time is computed from the moment it ends.
pub fn spawn_daily_summary_task(job: Arc<DailySummaryJob>, schedule: DailySchedule) -> JoinHandle<()> {
    info!(
        "Starting daily summary task (fires at {} local time)",
        schedule.time().format("%H:%M")
    );

    tokio::spawn(async move {
        let mut last_fire: Option<DateTime<Local>> = None;
        loop {
            let now = Local::now();
            let fire_at = schedule.next_fire(&now, last_fire.as_ref());
            let delay = delay_until(&now, &fire_at);
            info!("Next daily summary in {} seconds", delay.as_secs());
            tokio::time::sleep(delay).await;
            last_fire = Some(fire_at);

            let today = fire_at.date_naive();
            if let Err(e) = job.run(today).await {
                error!("Daily summary for {} failed: {}", today, e);
            }
        }
    })
}
