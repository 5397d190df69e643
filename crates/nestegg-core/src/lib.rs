//! Nestegg Core Library
//!
//! Shared functionality for the Nestegg personal finance client:
//! - Record model for transactions and savings instruments
//! - Aggregation (totals, balance, category breakdown, summaries)
//! - Rule-based insight engine for savings advice
//! - Gateway to the finance API, with local drafts and an offline mirror
//! - Layered configuration

pub mod aggregate;
pub mod config;
pub mod error;
pub mod gateway;
pub mod insights;
pub mod models;
pub mod money;

/// Test utilities including a mock finance API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    active_count, average_yield_rate, balance, categories, expense_by_category, expense_count,
    filter_transactions, top_expense_category, total_amount, total_by_type, CategoryTotals,
    FinancialSummary, TransactionFilter,
};
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{
    ApiClient, LocalStore, RecordBook, RecordStore, RemoteStore, Session, SessionStore,
    SyncReport,
};
pub use insights::{portfolio_advice, Advice, InsightEngine, PortfolioAdvice, Severity};
pub use models::{
    AuthResponse, Location, Origin, Record, RecordId, Resource, SavingsDraft, SavingsInstrument,
    SavingsStatus, Transaction, TransactionDraft, TransactionType, User,
};
