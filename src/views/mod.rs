//! View definitions and loaders.
//!
//! # Data Flow
//! ```text
//! RouteConfig.view
//!     → inline content / eager file read → View (direct)
//!     → lazy file                        → FsViewLoader (deferred)
//!
//! First navigation to a deferred route:
//!     routing slot → ViewLoader::load() → View → cached as Arc<View>
//! ```
//!
//! # Design Decisions
//! - A view is an immutable blob plus its content type
//! - Loaders are a trait so closures and filesystem sources share one seam
//! - Load failures are values (`ViewLoadError`), cloneable so one in-flight
//!   load can report the same failure to every waiter

pub mod loader;
pub mod view;

pub use loader::{FsViewLoader, LoadFuture, ViewLoadError, ViewLoader};
pub use view::View;
