#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod progress;
pub mod time;

pub use catalog::{CatalogError, build_catalog, group_by_category};
pub use progress::{PaperStatus, Progress, compute_progress};
pub use time::Clock;
