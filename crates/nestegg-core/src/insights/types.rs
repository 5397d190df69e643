//! Core types for the insight engine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{months_between, Location, SavingsInstrument, SavingsStatus};
use crate::money::{format_amount, format_rate};

/// Groups of rules, evaluated in this order for every instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetKind {
    /// Per-location base message and refinements
    Location,
    /// Exactly one message for the balance band
    AmountTier,
    /// Rules that apply regardless of location
    CrossCutting,
}

impl RuleSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::Location => "location",
            RuleSetKind::AmountTier => "amount_tier",
            RuleSetKind::CrossCutting => "cross_cutting",
        }
    }
}

impl fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleSetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "location" => Ok(RuleSetKind::Location),
            "amount_tier" => Ok(RuleSetKind::AmountTier),
            "cross_cutting" => Ok(RuleSetKind::CrossCutting),
            _ => Err(format!("Unknown rule set: {}", s)),
        }
    }
}

/// How much attention a piece of advice deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth acting on when convenient
    Attention,
    /// Money is being lost or put at risk
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }

    /// Numeric priority (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Attention => 2,
            Severity::Warning => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generated advisory line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    /// Stable rule key (e.g. "bank.low_yield")
    pub key: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// The inputs every instrument rule looks at
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentFacts {
    pub amount: Decimal,
    pub location: Location,
    /// Annual yield in percent
    pub yield_rate: Decimal,
    /// Whole 30-day months since the start date (negative for future dates)
    pub months_passed: i64,
    pub status: SavingsStatus,
}

impl InstrumentFacts {
    pub fn new(
        amount: Decimal,
        location: Location,
        yield_rate: Decimal,
        date: NaiveDate,
        status: SavingsStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            location,
            yield_rate,
            months_passed: months_between(date, now),
            status,
        }
    }

    pub fn from_instrument(instrument: &SavingsInstrument, now: DateTime<Utc>) -> Self {
        Self::new(
            instrument.amount,
            instrument.location.clone(),
            instrument.yield_rate,
            instrument.date,
            instrument.status,
            now,
        )
    }

    pub fn amount_below(&self, threshold: i64) -> bool {
        self.amount < Decimal::from(threshold)
    }

    pub fn amount_above(&self, threshold: i64) -> bool {
        self.amount > Decimal::from(threshold)
    }

    pub fn yield_below(&self, threshold: i64) -> bool {
        self.yield_rate < Decimal::from(threshold)
    }

    pub fn yield_above(&self, threshold: i64) -> bool {
        self.yield_rate > Decimal::from(threshold)
    }

    pub fn is_active(&self) -> bool {
        self.status == SavingsStatus::Active
    }

    pub fn is_inactive(&self) -> bool {
        self.status == SavingsStatus::Inactive
    }

    /// Amount as shown in messages ("90,000")
    pub fn amount_text(&self) -> String {
        format_amount(self.amount)
    }

    /// Yield as shown in messages ("3.5")
    pub fn rate_text(&self) -> String {
        format_rate(self.yield_rate)
    }
}

/// A single `(predicate, message)` entry of a rule table
#[derive(Clone, Copy)]
pub struct Rule {
    pub key: &'static str,
    pub severity: Severity,
    applies: fn(&InstrumentFacts) -> bool,
    message: fn(&InstrumentFacts) -> String,
}

impl Rule {
    pub fn new(
        key: &'static str,
        severity: Severity,
        applies: fn(&InstrumentFacts) -> bool,
        message: fn(&InstrumentFacts) -> String,
    ) -> Self {
        Self {
            key,
            severity,
            applies,
            message,
        }
    }

    /// A rule whose predicate is always true
    pub fn always(
        key: &'static str,
        severity: Severity,
        message: fn(&InstrumentFacts) -> String,
    ) -> Self {
        Self::new(key, severity, |_| true, message)
    }

    pub fn applies(&self, facts: &InstrumentFacts) -> bool {
        (self.applies)(facts)
    }

    /// Render the advice if the predicate holds
    pub fn evaluate(&self, facts: &InstrumentFacts) -> Option<Advice> {
        if self.applies(facts) {
            Some(Advice {
                key: self.key,
                severity: self.severity,
                message: (self.message)(facts),
            })
        } else {
            None
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("key", &self.key)
            .field("severity", &self.severity)
            .finish()
    }
}
