pub mod compute;
pub mod window;

pub use compute::{compute_indicators, compute_security};
