use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;

/// Per-request timing events on the dedicated `api.timing` target, which is
/// routed to its own log files.
#[derive(Debug)]
pub struct RequestTimer {
    endpoint: &'static str,
    started_at: DateTime<Utc>,
    started_perf: Instant,
    status: String,
    detail: Option<String>,
    completed: bool,
}

impl RequestTimer {
    pub fn start(endpoint: &'static str) -> Self {
        let timer = RequestTimer {
            endpoint,
            started_at: Utc::now(),
            started_perf: Instant::now(),
            status: "success".to_string(),
            detail: None,
            completed: false,
        };
        info!(
            target: "api.timing",
            "event=request_received endpoint={} received_at={}",
            timer.endpoint,
            timer.started_at.to_rfc3339()
        );
        timer
    }

    pub fn mark_status(&mut self, status: &str, detail: Option<String>) {
        self.status = status.to_string();
        self.detail = detail;
    }

    pub fn log_completed(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        let completed_at = Utc::now();
        let duration = self.started_perf.elapsed().as_secs_f64();
        info!(
            target: "api.timing",
            "event=request_completed endpoint={} started_at={} completed_at={} duration_s={:.3} status={} detail={}",
            self.endpoint,
            self.started_at.to_rfc3339(),
            completed_at.to_rfc3339(),
            duration,
            self.status,
            self.detail.clone().unwrap_or_default()
        );
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.log_completed();
    }
}
