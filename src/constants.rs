//! Application constants and configuration

pub const APP_NAME: &str = "Lifecycle Form";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FORM_TITLE: &str = "Form Component with Lifecycle Methods";
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const SIMULATED_FAULT_MESSAGE: &str = "Simulated error for testing!";

/// Artificial latency of the stubbed submit call
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;
/// Artificial latency of the stubbed fetch started on mount
pub const DEFAULT_MOUNT_FETCH_DELAY_MS: u64 = 1000;
