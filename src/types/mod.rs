//! Core domain types for the bisector.

pub mod ids;
pub mod outcome;
pub mod reference;

// Re-export commonly used types at the module level
pub use ids::{InvalidSha, Sha};
pub use outcome::Outcome;
pub use reference::{Reference, ReferenceError};
