use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;

use chrono::Local;
use cron::Schedule;
use tracing::{error, info};

use crate::error::ReclaimError;

/// Decides when the reclamation task runs. Constructed by the caller
/// and passed in; there is no process-wide scheduler state.
pub trait Trigger {
    fn run(
        &self,
        task: &mut dyn FnMut() -> Result<(), ReclaimError>,
    ) -> Result<(), ReclaimError>;
}

/// Fires the task on a crontab schedule, forever. A failing tick is
/// logged and the schedule re-arms for the next occurrence; there is no
/// backoff and no circuit breaker.
#[derive(Debug)]
pub struct CronTrigger {
    expression: String,
    schedule: Schedule,
}

impl CronTrigger {
    pub fn new(expression: &str) -> Result<Self, ReclaimError> {
        let normalized = normalize_crontab(expression);
        let schedule =
            Schedule::from_str(&normalized).map_err(|err| ReclaimError::InvalidSchedule {
                expression: expression.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }
}

impl Trigger for CronTrigger {
    fn run(
        &self,
        task: &mut dyn FnMut() -> Result<(), ReclaimError>,
    ) -> Result<(), ReclaimError> {
        info!("scheduled mode active: {}", self.expression);
        loop {
            let Some(next) = self.schedule.upcoming(Local).next() else {
                return Err(ReclaimError::InvalidSchedule {
                    expression: self.expression.clone(),
                    reason: "schedule has no upcoming occurrence".to_string(),
                });
            };
            info!("next run at {next}");
            if let Ok(wait) = (next - Local::now()).to_std() {
                thread::sleep(wait);
            }
            if let Err(err) = task() {
                error!("scheduled run failed: {err}");
            }
        }
    }
}

/// The `cron` crate wants a seconds field; a plain five-field crontab
/// expression gets one prepended.
fn normalize_crontab(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// In-process mutual exclusion for runs. A tick that finds the lock
/// held is expected to skip, not queue; the guard releases on every
/// exit path.
#[derive(Default)]
pub struct RunLock {
    inner: Mutex<()>,
}

pub struct RunGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl RunLock {
    pub fn try_acquire(&self) -> Option<RunGuard<'_>> {
        self.inner
            .try_lock()
            .ok()
            .map(|guard| RunGuard { _guard: guard })
    }
}
