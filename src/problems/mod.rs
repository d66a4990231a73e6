//! Practice problems, their attempt history, and the pools that hold them

pub mod models;
pub mod pool;

pub use models::*;
pub use pool::{NextUp, Pool};
