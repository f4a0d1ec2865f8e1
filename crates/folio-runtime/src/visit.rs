#![forbid(unsafe_code)]

//! Visitor counter: remote count, once-per-day increment, badge text.
//!
//! The counter service speaks a two-route protocol:
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/api/visit` | `{"count": n}` |
//! | `POST` | `/api/visit` | `{"count": n}` after incrementing |
//!
//! [`VisitTracker::sync`] reads the count, then increments at most once per
//! calendar day per browser, remembered through a `last_visit_date` marker
//! (`YYYY-MM-DD`, UTC) in the same storage as the layout. A failed read
//! renders the badge as unavailable; a failed increment keeps the count
//! already shown and leaves the marker untouched so the next load retries.

use std::fmt;

use chrono::NaiveDate;

use crate::cancellation::{Cancelled, CancellationToken};
use crate::state_persistence::{StorageBackend, StorageError, StorageResult};

/// Storage key of the once-per-day marker.
pub const LAST_VISIT_KEY: &str = "last_visit_date";

/// Errors from the counter service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("counter service returned status {0}")]
    Status(u16),
    #[error("invalid counter response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Remote visit count.
pub trait VisitCounter {
    fn current(&self) -> Result<u64, ServiceError>;
    fn increment(&self) -> Result<u64, ServiceError>;
}

#[cfg(feature = "http")]
pub use http::HttpVisitCounter;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::blocking::{Client, Response};
    use serde::Deserialize;

    use super::{ServiceError, VisitCounter};

    #[derive(Deserialize)]
    struct CountBody {
        #[serde(default)]
        count: Option<serde_json::Number>,
    }

    /// Blocking client for `/api/visit`.
    #[derive(Debug, Clone)]
    pub struct HttpVisitCounter {
        client: Client,
        endpoint: String,
        visitor_id: Option<String>,
    }

    impl HttpVisitCounter {
        /// Client for the service rooted at `base_url`.
        pub fn new(base_url: &str) -> Result<Self, ServiceError> {
            let client = Client::builder()
                .connect_timeout(Duration::from_secs(2))
                .timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                client,
                endpoint: format!("{}/api/visit", base_url.trim_end_matches('/')),
                visitor_id: None,
            })
        }

        /// Send `x-visitor-id` with increments.
        #[must_use]
        pub fn with_visitor_id(mut self, id: impl Into<String>) -> Self {
            self.visitor_id = Some(id.into());
            self
        }

        #[must_use]
        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn read_count(response: Response) -> Result<u64, ServiceError> {
            let status = response.status();
            if !status.is_success() {
                return Err(ServiceError::Status(status.as_u16()));
            }
            let body: CountBody = response.json()?;
            match body.count {
                None => Ok(0),
                Some(n) => n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
                    .ok_or_else(|| ServiceError::InvalidResponse(format!("count {n}"))),
            }
        }
    }

    impl VisitCounter for HttpVisitCounter {
        fn current(&self) -> Result<u64, ServiceError> {
            Self::read_count(self.client.get(&self.endpoint).send()?)
        }

        fn increment(&self) -> Result<u64, ServiceError> {
            let mut request = self.client.post(&self.endpoint);
            if let Some(id) = &self.visitor_id {
                request = request.header("x-visitor-id", id);
            }
            Self::read_count(request.send()?)
        }
    }
}

/// Once-per-day increment gate backed by a date marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitGate {
    key: String,
}

impl Default for VisitGate {
    fn default() -> Self {
        Self {
            key: LAST_VISIT_KEY.to_owned(),
        }
    }
}

impl VisitGate {
    /// Whether no increment has been recorded for `today`. Unreadable
    /// markers count as absent.
    #[must_use]
    pub fn should_increment(&self, backend: &dyn StorageBackend, today: NaiveDate) -> bool {
        match backend.load(&self.key) {
            Ok(Some(marker)) => marker.trim() != today.format("%Y-%m-%d").to_string(),
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(target: "folio.visit", error = %e, "visit marker unreadable");
                true
            }
        }
    }

    /// Record that `today` has been counted.
    pub fn mark(&self, backend: &mut dyn StorageBackend, today: NaiveDate) -> StorageResult<()> {
        backend.save(&self.key, &today.format("%Y-%m-%d").to_string())
    }
}

/// Current UTC calendar date.
#[must_use]
pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// English ordinal suffix; empty for zero.
#[must_use]
pub const fn ordinal_suffix(n: u64) -> &'static str {
    if n == 0 {
        return "";
    }
    if matches!(n % 100, 11..=13) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// What the visitor badge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitBadge {
    #[default]
    Loading,
    Count(u64),
    Unavailable,
}

impl fmt::Display for VisitBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("…"),
            Self::Count(n) => write!(f, "{n}{}", ordinal_suffix(*n)),
            Self::Unavailable => f.write_str("—"),
        }
    }
}

/// Drives one page load's worth of counter traffic.
#[derive(Debug, Clone)]
pub struct VisitTracker {
    gate: VisitGate,
    increment_on_load: bool,
    incremented: bool,
    badge: VisitBadge,
}

impl Default for VisitTracker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VisitTracker {
    #[must_use]
    pub fn new(increment_on_load: bool) -> Self {
        Self {
            gate: VisitGate::default(),
            increment_on_load,
            incremented: false,
            badge: VisitBadge::Loading,
        }
    }

    #[must_use]
    pub const fn badge(&self) -> VisitBadge {
        self.badge
    }

    /// Fetch the count and, if due, increment it.
    ///
    /// Returns `Err(Cancelled)` without touching the badge or the marker if
    /// `token` fires between steps.
    pub fn sync(
        &mut self,
        counter: &dyn VisitCounter,
        backend: &mut dyn StorageBackend,
        today: NaiveDate,
        token: &CancellationToken,
    ) -> Result<VisitBadge, Cancelled> {
        token.check()?;
        let current = counter.current();
        token.check()?;
        let count = match current {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(target: "folio.visit", error = %e, "visit count unavailable");
                self.badge = VisitBadge::Unavailable;
                return Ok(self.badge);
            }
        };
        self.badge = VisitBadge::Count(count);

        if !self.increment_on_load || self.incremented || !self.gate.should_increment(backend, today) {
            return Ok(self.badge);
        }
        self.incremented = true;

        let incremented = counter.increment();
        token.check()?;
        match incremented {
            Ok(count) => {
                self.badge = VisitBadge::Count(count);
                if let Err(e) = self.gate.mark(backend, today) {
                    tracing::warn!(target: "folio.visit", error = %e, "visit marker not saved");
                }
                tracing::info!(target: "folio.visit", count, "visit counted");
            }
            Err(e) => {
                tracing::warn!(target: "folio.visit", error = %e, "visit increment failed");
            }
        }
        Ok(self.badge)
    }
}
