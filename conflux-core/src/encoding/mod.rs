//! Parsing of the text-encoded list attributes carried by source roads.
//!
//! Speed limits and connectors arrive as serialized lists of tagged records.
//! This module is the only place that scans those strings; everything past it
//! works with typed values.

mod connectors;
mod lenient;
mod speed;

pub use connectors::parse_connector_fractions;
pub use speed::{extract_speed_limit, parse_fallback_speed};
