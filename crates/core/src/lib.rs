pub mod breadth;
pub mod config;
pub mod market;
pub mod store;
