//! Repository implementations module.
//!
//! - `local`: In-memory snapshot, loaded from JSON or built from records
pub mod local;

pub use local::LocalRepository;
