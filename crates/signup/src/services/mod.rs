//! Business logic services.

pub mod signup;

pub use signup::{SignupError, SignupService};
