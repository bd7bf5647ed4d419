//! Common utilities and shared components

pub mod constants;
pub mod error;
pub mod logging;

pub use constants::*;
pub use error::*;
pub use logging::init_logging;
