pub mod cli;
pub mod compare;
pub mod config;
pub mod download;
pub mod driver;
pub mod env;
pub mod error;
pub mod job;
pub mod logging;
pub mod remote;
pub mod workspace;

pub use error::{CompareError, Result};
