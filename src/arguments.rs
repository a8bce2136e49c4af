//! Centralized argument handling for launchbot
//!
//! Stores the command line once and exposes debug-flag checks so modules
//! don't re-parse `env::args()` themselves.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Override the stored arguments (used by tests)
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Get a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Check if a specific argument is present on the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Discovery module debug mode
pub fn is_debug_discovery_enabled() -> bool {
    has_arg("--debug-discovery")
}

/// Filtering module debug mode
pub fn is_debug_filtering_enabled() -> bool {
    has_arg("--debug-filtering")
}

/// API calls debug mode
pub fn is_debug_api_enabled() -> bool {
    has_arg("--debug-api")
}

/// Database debug mode
pub fn is_debug_database_enabled() -> bool {
    has_arg("--debug-database")
}

/// Alert engine debug mode
pub fn is_debug_alerts_enabled() -> bool {
    has_arg("--debug-alerts")
}
