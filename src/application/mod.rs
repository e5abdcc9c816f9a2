//! # Application Layer
//!
//! Use cases and the ports (traits) that the connector layer implements.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
