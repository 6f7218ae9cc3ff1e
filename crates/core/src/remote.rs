use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::json;
use tracing::debug;

use crate::error::ReclaimError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// rclone remote-control endpoint, e.g. `http://host:5572`.
    pub url: String,
    /// Remote name files are moved from (`/` for the local fs root).
    pub source_fs: String,
    /// Remote name files are moved to.
    pub dest_fs: String,
    pub username: String,
    pub password: String,
    pub dry_run: bool,
}

/// Client for the three rclone rc operations this tool consumes:
/// liveness probe, global options update, and per-file move.
pub struct RemoteClient {
    config: RemoteConfig,
    source_root: String,
    dest_root: String,
    http: Client,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, ReclaimError> {
        let http = Client::builder()
            .user_agent(concat!("disk-reclaimer/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let source_root = fs_root(&config.source_fs);
        let dest_root = fs_root(&config.dest_fs);
        Ok(Self {
            config,
            source_root,
            dest_root,
            http,
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Liveness probe. Failure means no move is attempted this run.
    pub fn ping(&self) -> Result<(), ReclaimError> {
        let response = self
            .post("rc/noop")
            .json(&json!({}))
            .send()
            .map_err(|err| ReclaimError::RemoteUnavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ReclaimError::RemoteUnavailable(format!(
                "liveness probe returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Push the per-run rclone options: dry-run toggle plus removal of
    /// source directories the moves leave empty. Sent once per run,
    /// before any move.
    pub fn set_options(&self) -> Result<(), ReclaimError> {
        let body = json!({
            "main": {
                "DryRun": self.config.dry_run,
                "DeleteEmptySrcDirs": true,
            }
        });
        debug!(dry_run = self.config.dry_run, "pushing remote options");
        let response = self
            .post("options/set")
            .json(&body)
            .send()
            .map_err(|err| ReclaimError::RemoteUnavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ReclaimError::RemoteUnavailable(format!(
                "options/set returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Move one file. `src_relative` is the rewrite-resolved path on the
    /// source remote; `dst_relative` is the path recorded on the
    /// destination remote.
    pub fn move_file(&self, src_relative: &str, dst_relative: &str) -> Result<(), ReclaimError> {
        let body = json!({
            "srcFs": self.source_root,
            "srcRemote": src_relative,
            "dstFs": self.dest_root,
            "dstRemote": dst_relative,
        });
        debug!(
            src_fs = %self.source_root,
            src = src_relative,
            dst_fs = %self.dest_root,
            dst = dst_relative,
            "dispatching move"
        );
        let response = self
            .post("operations/movefile")
            .json(&body)
            .send()
            .map_err(|err| ReclaimError::Dispatch {
                path: dst_relative.to_string(),
                reason: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ReclaimError::Dispatch {
                path: dst_relative.to_string(),
                reason: format!("operations/movefile returned {}", response.status()),
            });
        }
        Ok(())
    }

    fn post(&self, operation: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.url.trim_end_matches('/'), operation);
        self.http
            .post(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }
}

/// rclone addresses a named remote as `name:`; a bare name gets the
/// trailing colon, while `/` and already-suffixed names pass through.
pub fn fs_root(name: &str) -> String {
    if name.is_empty() || name == "/" || name.ends_with(':') {
        name.to_string()
    } else {
        format!("{name}:")
    }
}


#[cfg(test)]
mod tests {
    use super::{fs_root, stub, RemoteClient, RemoteConfig};
    use crate::error::ReclaimError;

    fn config(url: &str) -> RemoteConfig {
        RemoteConfig {
            url: url.to_string(),
            source_fs: "/".to_string(),
            dest_fs: "archive".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
            dry_run: true,
        }
    }

    #[test]
    fn bare_remote_names_get_a_colon() {
        assert_eq!(fs_root("gdrive"), "gdrive:");
        assert_eq!(fs_root("gdrive:"), "gdrive:");
        assert_eq!(fs_root("/"), "/");
        assert_eq!(fs_root(""), "");
    }

    #[test]
    fn ping_accepts_a_success_status() {
        let (url, hits) = stub::serve("HTTP/1.1 200 OK", 1);
        let client = RemoteClient::new(config(&url)).unwrap();
        client.ping().unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn ping_surfaces_remote_unavailable_on_failure_status() {
        let (url, _hits) = stub::serve("HTTP/1.1 500 Internal Server Error", 1);
        let client = RemoteClient::new(config(&url)).unwrap();
        assert!(matches!(
            client.ping(),
            Err(ReclaimError::RemoteUnavailable(_))
        ));
    }

    #[test]
    fn failed_move_is_a_dispatch_error() {
        let (url, _hits) = stub::serve("HTTP/1.1 403 Forbidden", 1);
        let client = RemoteClient::new(config(&url)).unwrap();
        assert!(matches!(
            client.move_file("/remote/a.bin", "/mnt/a.bin"),
            Err(ReclaimError::Dispatch { .. })
        ));
    }
}
