//! Route evaluation.
//!
//! Runs a route's compiled conditions against one request with AND
//! semantics, stopping at the first condition that does not hold.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::http::request::RequestView;
use crate::routing::condition::Subject;
use crate::routing::router::Route;

/// Which redirect a request earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Evaluate `route` for `request` at time `now`.
///
/// A route without conditions always succeeds.
pub fn evaluate(route: &Route, request: &RequestView<'_>, now: DateTime<FixedOffset>) -> Outcome {
    // Formatted lazily; most routes never look at the time.
    let mut now_rfc3339: Option<String> = None;

    for condition in &route.conditions {
        let actual: &str = match condition.subject() {
            Subject::UserAgent => request.user_agent(),
            Subject::Time => now_rfc3339.get_or_insert_with(|| format_rfc3339(now)).as_str(),
        };

        let passed = condition.check(actual);

        tracing::debug!(
            route = %route.name,
            condition = %condition,
            actual = %actual,
            expected = %condition.expected(),
            passed,
            "Condition evaluated"
        );

        if !passed {
            return Outcome::Failure;
        }
    }

    Outcome::Success
}

/// RFC3339 at second precision, `Z` for UTC.
pub fn format_rfc3339(ts: DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
