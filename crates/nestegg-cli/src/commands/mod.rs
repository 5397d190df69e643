//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `auth` - Account commands (login, register, logout, whoami, profile)
//! - `core` - Shared context (config, client, session) and input parsers
//! - `reports` - Summary, portfolio insights and sync
//! - `savings` - Savings instrument commands (list, add, edit, delete, insights)
//! - `transactions` - Transaction commands (list, add, edit, delete)

pub mod auth;
pub mod core;
pub mod reports;
pub mod savings;
pub mod transactions;

// Re-export command functions for main.rs
pub use auth::*;
pub use self::core::*;
pub use reports::*;
pub use savings::*;
pub use transactions::*;

use nestegg_core::Severity;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "💡",
        Severity::Attention => "👀",
        Severity::Warning => "⚠️ ",
    }
}
