//! Shared types for the award collection pipeline
//!
//! Holds the data model (strategies, pages, awards, output rows), the
//! transport failure classification and the logging setup used by the
//! collector crate.

pub mod award;
pub mod errors;
pub mod logging;
pub mod types;

pub use award::*;
pub use errors::*;
pub use types::*;
