//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (path?query#fragment)
//!     → router.rs (strip base, ordered lookup)
//!     → matcher.rs (evaluate path pattern, capture params)
//!     → slot.rs (direct view, or load deferred view once and cache)
//!     → current.rs (publish if still the latest navigation)
//!     → Return: Resolution or ResolveError
//!
//! Route Registration (at startup):
//!     RouteEntry[]
//!     → Parse patterns, reject duplicate names/paths
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod current;
pub mod entry;
pub mod error;
pub mod matcher;
pub mod router;
mod slot;

pub use current::CurrentRoute;
pub use entry::{RouteEntry, ViewRef};
pub use error::{ConfigurationError, ResolveError};
pub use matcher::{Params, PathPattern};
pub use router::{Resolution, RouteInfo, RouteMatch, RouteTable};
