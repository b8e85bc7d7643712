pub mod daily;

pub use daily::{DailyCounters, aggregate_breadth};
