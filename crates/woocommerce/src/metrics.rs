//! Singer metric events
//!
//! Each event is logged as a `METRIC: {json}` line at info level, the format
//! Singer targets and log scrapers expect. Metrics are advisory only.

use log::info;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// An observable occurrence that can be emitted as a metric line
pub trait InternalEvent {
    /// Render the metric document
    fn metric(&self) -> Value;

    /// Emit this event through the logger
    fn emit(self)
    where
        Self: Sized,
    {
        info!("METRIC: {}", self.metric());
    }
}

/// Outcome of one HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequestTimed {
    /// Stream the request was made for
    pub endpoint: String,
    /// Response status, when the server answered at all
    pub http_status_code: Option<u16>,
    pub succeeded: bool,
    pub duration: Duration,
}

impl InternalEvent for HttpRequestTimed {
    fn metric(&self) -> Value {
        let status = if self.succeeded { "succeeded" } else { "failed" };
        json!({
            "type": "timer",
            "metric": "http_request_duration",
            "value": self.duration.as_secs_f64(),
            "tags": {
                "endpoint": self.endpoint,
                "http_status_code": self.http_status_code,
                "status": status,
            }
        })
    }
}

/// Number of records emitted for a stream
#[derive(Debug, Clone)]
pub struct RecordsCounted {
    pub endpoint: String,
    pub count: u64,
}

impl InternalEvent for RecordsCounted {
    fn metric(&self) -> Value {
        json!({
            "type": "counter",
            "metric": "record_count",
            "value": self.count,
            "tags": { "endpoint": self.endpoint }
        })
    }
}

/// Times one HTTP request and emits [`HttpRequestTimed`] when finished
pub struct HttpRequestTimer {
    endpoint: String,
    started: Instant,
}

impl HttpRequestTimer {
    pub fn start(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            started: Instant::now(),
        }
    }

    /// Stop the timer and emit the metric
    pub fn finish(self, http_status_code: Option<u16>, succeeded: bool) {
        HttpRequestTimed {
            endpoint: self.endpoint,
            http_status_code,
            succeeded,
            duration: self.started.elapsed(),
        }
        .emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_timer_metric() {
        let event = HttpRequestTimed {
            endpoint: "orders".to_string(),
            http_status_code: Some(200),
            succeeded: true,
            duration: Duration::from_millis(1500),
        };
        let metric = event.metric();
        assert_eq!(metric["type"], "timer");
        assert_eq!(metric["metric"], "http_request_duration");
        assert_eq!(metric["value"], 1.5);
        assert_eq!(metric["tags"]["http_status_code"], 200);
        assert_eq!(metric["tags"]["status"], "succeeded");
    }

    #[test]
    fn test_http_timer_metric_without_status() {
        let event = HttpRequestTimed {
            endpoint: "orders".to_string(),
            http_status_code: None,
            succeeded: false,
            duration: Duration::ZERO,
        };
        let metric = event.metric();
        assert!(metric["tags"]["http_status_code"].is_null());
        assert_eq!(metric["tags"]["status"], "failed");
    }

    #[test]
    fn test_record_counter_metric() {
        let metric = RecordsCounted {
            endpoint: "orders".to_string(),
            count: 101,
        }
        .metric();
        assert_eq!(
            metric,
            json!({
                "type": "counter",
                "metric": "record_count",
                "value": 101,
                "tags": { "endpoint": "orders" }
            })
        );
    }
}
