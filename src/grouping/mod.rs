//! Date bucketing of extracted messages into display sections

pub mod date_buckets;

pub use date_buckets::{categorize, group_by_date, group_by_date_at};
