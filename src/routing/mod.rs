//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → condition.rs (raw text → typed Condition with bound comparator)
//!     → router.rs (freeze as immutable RouteTable)
//!
//! Incoming Request (method, path, User-Agent, now)
//!     → router.rs (route lookup)
//!     → evaluator.rs (short-circuit AND over conditions)
//!     → Return: Outcome::Success or Outcome::Failure
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Comparator chosen at compile time, never by string on the hot path
//! - Unknown subjects/operators are startup errors, not runtime surprises
//! - Time comparisons fail closed on unparseable timestamps

pub mod clock;
pub mod comparator;
pub mod condition;
pub mod evaluator;
pub mod router;

pub use clock::{Clock, FixedClock, SystemClock};
pub use condition::{Condition, ConditionError, Operator, Subject};
pub use evaluator::{evaluate, Outcome};
pub use router::{Lookup, Route, RouteTable, RouteTableError};
