//! Initialization

// Modules
pub mod logger;
pub mod tokio_runtime;
