mod client;
mod download;
mod error;
mod extract;
pub mod models;
mod task;
mod upload;

pub use client::TripoClient;
pub use error::TripoError;
pub use models::{ConversionParams, Task, TaskStatus, DEFAULT_MODEL_VERSION};

pub type Result<T> = std::result::Result<T, TripoError>;
