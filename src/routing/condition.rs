//! Condition compiler.
//!
//! Turns a raw `"<Subject> <Operator> <Expected>"` string into a [`Condition`]
//! whose comparator is chosen once, here, instead of on every request.
//!
//! # Grammar
//! ```text
//! condition := subject WS operator WS expected
//! subject   := "User-Agent" | "Time"
//! operator  := "has" | "is" | "starts_with" | "ends_with"   (User-Agent)
//!            | "lt" | "gt"                                  (Time)
//! expected  := any token without whitespace
//! ```
//!
//! Time literals are kept verbatim; a malformed timestamp is only noticed
//! when the condition is evaluated, and then evaluates to false.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::routing::comparator::{self, CompareFn};

/// Errors produced while compiling a condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("malformed condition '{raw}': expected 3 tokens, found {tokens}")]
    Malformed { raw: String, tokens: usize },

    #[error("unknown subject '{subject}' in condition '{raw}'")]
    UnknownSubject { raw: String, subject: String },

    #[error("unknown operator '{operator}' for subject {subject} in condition '{raw}'")]
    UnknownOperator {
        raw: String,
        subject: Subject,
        operator: String,
    },
}

/// The request-derived value a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    UserAgent,
    Time,
}

impl FromStr for Subject {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User-Agent" => Ok(Subject::UserAgent),
            "Time" => Ok(Subject::Time),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::UserAgent => write!(f, "User-Agent"),
            Subject::Time => write!(f, "Time"),
        }
    }
}

/// Operators, closed over every valid subject/operator pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// User-Agent contains the expected text.
    Has,
    /// User-Agent equals the expected text.
    Is,
    StartsWith,
    EndsWith,
    /// Now is strictly before the expected time.
    Lt,
    /// Now is strictly after the expected time.
    Gt,
}

impl Operator {
    /// Resolve an operator token for the given subject.
    pub fn parse(subject: Subject, token: &str) -> Option<Self> {
        match (subject, token) {
            (Subject::UserAgent, "has") => Some(Operator::Has),
            (Subject::UserAgent, "is") => Some(Operator::Is),
            (Subject::UserAgent, "starts_with") => Some(Operator::StartsWith),
            (Subject::UserAgent, "ends_with") => Some(Operator::EndsWith),
            (Subject::Time, "lt") => Some(Operator::Lt),
            (Subject::Time, "gt") => Some(Operator::Gt),
            _ => None,
        }
    }

    /// The comparator implementing this operator.
    pub fn comparator(self) -> CompareFn {
        match self {
            Operator::Has => comparator::contains,
            Operator::Is => comparator::equals,
            Operator::StartsWith => comparator::has_prefix,
            Operator::EndsWith => comparator::has_suffix,
            Operator::Lt => comparator::time_before,
            Operator::Gt => comparator::time_after,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Has => "has",
            Operator::Is => "is",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
        };
        write!(f, "{}", s)
    }
}

/// A compiled condition. Immutable and shared across requests.
#[derive(Clone)]
pub struct Condition {
    subject: Subject,
    operator: Operator,
    expected: String,
    raw: String,
    compare: CompareFn,
}

impl Condition {
    /// Compile a raw condition string.
    pub fn compile(raw: &str) -> Result<Self, ConditionError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let &[subject, operator, expected] = tokens.as_slice() else {
            return Err(ConditionError::Malformed {
                raw: raw.to_string(),
                tokens: tokens.len(),
            });
        };

        let subject: Subject = subject.parse().map_err(|_| ConditionError::UnknownSubject {
            raw: raw.to_string(),
            subject: subject.to_string(),
        })?;

        let operator =
            Operator::parse(subject, operator).ok_or_else(|| ConditionError::UnknownOperator {
                raw: raw.to_string(),
                subject,
                operator: operator.to_string(),
            })?;

        Ok(Self {
            subject,
            operator,
            expected: expected.to_string(),
            raw: raw.to_string(),
            compare: operator.comparator(),
        })
    }

    /// Build a condition around an arbitrary comparator.
    #[cfg(test)]
    pub(crate) fn with_comparator(subject: Subject, expected: &str, compare: CompareFn) -> Self {
        let operator = match subject {
            Subject::UserAgent => Operator::Has,
            Subject::Time => Operator::Lt,
        };
        Self {
            subject,
            operator,
            expected: expected.to_string(),
            raw: format!("{} {} {}", subject, operator, expected),
            compare,
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// The text this condition was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Apply the bound comparator to a value taken from the request.
    pub fn check(&self, actual: &str) -> bool {
        (self.compare)(actual, &self.expected)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("subject", &self.subject)
            .field("operator", &self.operator)
            .field("expected", &self.expected)
            .finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_user_agent_operators() {
        let cases = [
            ("User-Agent has Chrome", Operator::Has),
            ("User-Agent is curl/8.0", Operator::Is),
            ("User-Agent starts_with Mozilla", Operator::StartsWith),
            ("User-Agent ends_with Safari/537.36", Operator::EndsWith),
        ];
        for (raw, op) in cases {
            let cond = Condition::compile(raw).unwrap();
            assert_eq!(cond.subject(), Subject::UserAgent);
            assert_eq!(cond.operator(), op);
            assert_eq!(cond.raw(), raw);
        }
    }

    #[test]
    fn test_compiled_comparators_behave() {
        let has = Condition::compile("User-Agent has Chrome").unwrap();
        assert!(has.check("Mozilla/5.0 Chrome/70"));
        assert!(!has.check("Mozilla/5.0 Firefox/62"));

        let is = Condition::compile("User-Agent is curl/8.0").unwrap();
        assert!(is.check("curl/8.0"));
        assert!(!is.check("curl/8.0.1"));

        let starts = Condition::compile("User-Agent starts_with Mozilla").unwrap();
        assert!(starts.check("Mozilla/5.0"));

        let ends = Condition::compile("User-Agent ends_with Chrome/70").unwrap();
        assert!(ends.check("Mozilla/5.0 Chrome/70"));
    }

    #[test]
    fn test_compile_time_operators() {
        let lt = Condition::compile("Time lt 2018-10-28T20:00:00+01:00").unwrap();
        assert_eq!(lt.subject(), Subject::Time);
        assert_eq!(lt.operator(), Operator::Lt);
        assert_eq!(lt.expected(), "2018-10-28T20:00:00+01:00");
        assert!(lt.check("2018-10-28T15:00:00+01:00"));
        assert!(!lt.check("2018-10-28T21:00:00+01:00"));

        let gt = Condition::compile("Time gt 2018-10-28T10:00:00+01:00").unwrap();
        assert_eq!(gt.operator(), Operator::Gt);
        assert!(gt.check("2018-10-28T15:00:00+01:00"));
        assert!(!gt.check("2018-10-28T09:00:00+01:00"));
    }

    #[test]
    fn test_malformed_timestamp_compiles_but_fails_closed() {
        let cond = Condition::compile("Time lt someday").unwrap();
        assert_eq!(cond.expected(), "someday");
        assert!(!cond.check("2018-10-28T15:00:00+01:00"));
    }

    #[test]
    fn test_wrong_token_count() {
        assert_eq!(
            Condition::compile("User-Agent has").unwrap_err(),
            ConditionError::Malformed {
                raw: "User-Agent has".into(),
                tokens: 2
            }
        );
        assert!(matches!(
            Condition::compile("User-Agent has Mozilla/5.0 (X11)"),
            Err(ConditionError::Malformed { tokens: 4, .. })
        ));
        assert!(matches!(
            Condition::compile(""),
            Err(ConditionError::Malformed { tokens: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_subject_is_an_error() {
        assert_eq!(
            Condition::compile("Referer has google").unwrap_err(),
            ConditionError::UnknownSubject {
                raw: "Referer has google".into(),
                subject: "Referer".into()
            }
        );
        // Subjects are case-sensitive.
        assert!(matches!(
            Condition::compile("user-agent has Chrome"),
            Err(ConditionError::UnknownSubject { .. })
        ));
    }

    #[test]
    fn test_unknown_operator_is_an_error() {
        assert_eq!(
            Condition::compile("User-Agent lt Chrome").unwrap_err(),
            ConditionError::UnknownOperator {
                raw: "User-Agent lt Chrome".into(),
                subject: Subject::UserAgent,
                operator: "lt".into()
            }
        );
        assert!(matches!(
            Condition::compile("Time has 2018-10-28T20:00:00+01:00"),
            Err(ConditionError::UnknownOperator {
                subject: Subject::Time,
                ..
            })
        ));
    }

    #[test]
    fn test_display_round_trips_raw() {
        let cond = Condition::compile("User-Agent has Chrome").unwrap();
        assert_eq!(cond.to_string(), "User-Agent has Chrome");
    }
}
