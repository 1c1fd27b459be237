//! Human-readable rendering of allocation plans

mod markdown;

pub use markdown::{format_recommendation, format_recommendation_at};
