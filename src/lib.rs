// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cities;
pub mod clean;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod file;
pub mod progress;
pub mod record;
pub mod report;
pub mod scrape;
pub mod store;

pub use error::{Error, Result};
