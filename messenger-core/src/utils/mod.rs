pub mod helpers;
pub mod validation;

pub use helpers::{format_timestamp, parse_timestamp};
