// src/lib.rs
//! Terminal client for the AI Interview Coach backend

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

pub mod coach_cli;
pub mod core;
pub mod devices;
pub mod session;
pub mod types;

pub use crate::core::{CoachApi, ConfigManager, ResumeStore, ServiceClient};
pub use crate::session::{Loaded, Page, ViewState};
