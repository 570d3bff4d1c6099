pub mod error;
pub mod logger;


pub use error::{Result, WorkerError};
