//! # domains
//!
//! Entities, events, errors and port traits of the forum engine.
//! Nothing in this crate performs I/O.

pub mod error;
pub mod events;
pub mod models;
pub mod rank;
pub mod snapshot;
pub mod taxonomy;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use events::*;
pub use models::*;
pub use rank::*;
pub use snapshot::*;
pub use taxonomy::*;
pub use traits::*;
