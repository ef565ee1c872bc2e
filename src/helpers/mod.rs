//! Helper functions for dates and HTML escaping

mod date;
mod html;

pub use date::*;
pub use html::*;
