use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::ReclaimError;

/// How much of the logfile tail is attached to a notification.
const TAIL_BYTES: u64 = 2048;

const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier for an external monitoring endpoint: pinged at run start,
/// on success, and on failure, the latter two with the recent log tail
/// as payload. Notification transport failures are logged and
/// swallowed; they never change the run outcome.
pub struct Healthcheck {
    url: String,
    log_file: Option<PathBuf>,
    http: Client,
}

impl Healthcheck {
    pub fn new(url: String, log_file: Option<PathBuf>) -> Result<Self, ReclaimError> {
        let http = Client::builder()
            .user_agent(concat!("disk-reclaimer/", env!("CARGO_PKG_VERSION")))
            .timeout(PING_TIMEOUT)
            .build()?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            log_file,
            http,
        })
    }

    pub fn notify_start(&self) {
        debug!(url = %self.url, "healthcheck start ping");
        if let Err(err) = self.http.get(format!("{}/start", self.url)).send() {
            warn!("healthcheck start ping failed: {err}");
        }
    }

    pub fn notify_success(&self) {
        if let Err(err) = self.http.post(&self.url).body(self.log_tail()).send() {
            warn!("healthcheck success ping failed: {err}");
        }
    }

    pub fn notify_failure(&self) {
        if let Err(err) = self
            .http
            .post(format!("{}/fail", self.url))
            .body(self.log_tail())
            .send()
        {
            warn!("healthcheck failure ping failed: {err}");
        }
    }

    fn log_tail(&self) -> String {
        let Some(path) = &self.log_file else {
            return String::new();
        };
        match read_log_tail(path, TAIL_BYTES) {
            Ok(tail) => tail,
            Err(err) => {
                warn!("could not read log tail from {}: {err}", path.display());
                String::new()
            }
        }
    }
}

/// Run `task` bracketed by healthcheck notifications; without a
/// notifier this is just the task. The task's own error always
/// propagates, notification outcomes notwithstanding.
pub fn run_with_healthcheck<T>(
    healthcheck: Option<&Healthcheck>,
    task: impl FnOnce() -> Result<T, ReclaimError>,
) -> Result<T, ReclaimError> {
    if let Some(hc) = healthcheck {
        hc.notify_start();
    }
    match task() {
        Ok(value) => {
            if let Some(hc) = healthcheck {
                hc.notify_success();
            }
            Ok(value)
        }
        Err(err) => {
            if let Some(hc) = healthcheck {
                hc.notify_failure();
            }
            Err(err)
        }
    }
}

/// Last `max_bytes` of the file, shorter files returned whole.
pub fn read_log_tail(path: &Path, max_bytes: u64) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let length = file.metadata()?.len();
    file.seek(SeekFrom::Start(length.saturating_sub(max_bytes)))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
