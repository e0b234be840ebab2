//! External collaborators (remote services).

pub mod insights;

pub use insights::*;
