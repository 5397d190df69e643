//! Insight Engine - rule-based savings advice
//!
//! Every savings instrument is run through three ordered rule sets and the
//! matching rules produce one advisory line each:
//!
//! - **Location** - a base message for the instrument's location, then that
//!   location's refinements (or a generic fallback for unknown locations)
//! - **Amount tier** - exactly one message for the balance band
//! - **Cross-cutting** - yield, inactivity and size rules shared by all
//!   locations
//!
//! Rules carry stable keys so each one can be checked in isolation.
//! [`portfolio_advice`] adds whole-portfolio remarks from a
//! [`FinancialSummary`](crate::aggregate::FinancialSummary).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nestegg_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! for advice in engine.instrument_advice(&instrument, chrono::Utc::now()) {
//!     println!("[{}] {}", advice.severity, advice.message);
//! }
//! ```

pub mod amount_tier;
pub mod cross_cutting;
pub mod engine;
pub mod location;
pub mod summary;
pub mod types;

pub use amount_tier::AmountTierRules;
pub use cross_cutting::CrossCuttingRules;
pub use engine::{InsightEngine, RuleSet};
pub use location::{LocationBlock, LocationRules};
pub use summary::{portfolio_advice, PortfolioAdvice};
pub use types::{Advice, InstrumentFacts, Rule, RuleSetKind, Severity};
