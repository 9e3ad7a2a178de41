// src/core/mod.rs
//! Backend contract, HTTP client, configuration and client-side storage

pub mod api;
pub mod config_manager;
pub mod fs_ops;
pub mod service_client;
pub mod storage;

pub use api::{AudioClip, CoachApi, Turn};
pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
pub use service_client::ServiceClient;
pub use storage::ResumeStore;
