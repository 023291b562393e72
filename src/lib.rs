pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod records;

pub use error::{AppError, Result};
