//! Insight Engine - runs the rule sets over a savings instrument

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{Location, SavingsInstrument, SavingsStatus};

use super::types::{Advice, InstrumentFacts, RuleSetKind};
use super::{AmountTierRules, CrossCuttingRules, LocationRules};

/// A group of rules evaluated together
pub trait RuleSet: Send + Sync {
    /// Unique identifier for this rule set
    fn id(&self) -> RuleSetKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Advice for the matching rules, in table order
    fn evaluate(&self, facts: &InstrumentFacts) -> Vec<Advice>;
}

/// Evaluates every registered rule set in registration order
pub struct InsightEngine {
    rule_sets: Vec<Box<dyn RuleSet>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rule sets: location, amount tier,
    /// cross-cutting.
    pub fn new() -> Self {
        let mut engine = Self { rule_sets: vec![] };

        engine.register(Box::new(LocationRules::new()));
        engine.register(Box::new(AmountTierRules::new()));
        engine.register(Box::new(CrossCuttingRules::new()));

        engine
    }

    /// Register a rule set after the existing ones
    pub fn register(&mut self, rule_set: Box<dyn RuleSet>) {
        self.rule_sets.push(rule_set);
    }

    /// Run all rule sets and collect advice.
    ///
    /// Order is significant and preserved: advice is not re-sorted by
    /// severity. The location rules always produce at least one entry, so
    /// the result is never empty with the built-in rule sets.
    pub fn analyze(&self, facts: &InstrumentFacts) -> Vec<Advice> {
        let mut advice = Vec::new();
        for rule_set in &self.rule_sets {
            let produced = rule_set.evaluate(facts);
            tracing::debug!(
                rule_set = rule_set.id().as_str(),
                count = produced.len(),
                "Rule set evaluated"
            );
            advice.extend(produced);
        }
        advice
    }

    /// Advice for a stored instrument at `now`
    pub fn instrument_advice(
        &self,
        instrument: &SavingsInstrument,
        now: DateTime<Utc>,
    ) -> Vec<Advice> {
        self.analyze(&InstrumentFacts::from_instrument(instrument, now))
    }

    /// The advisory strings for one instrument's fields at `now`
    pub fn insights_for(
        &self,
        amount: Decimal,
        location: Location,
        yield_rate: Decimal,
        date: NaiveDate,
        status: SavingsStatus,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let facts = InstrumentFacts::new(amount, location, yield_rate, date, status, now);
        self.analyze(&facts)
            .into_iter()
            .map(|a| a.message)
            .collect()
    }

    /// Registered rule sets, in evaluation order
    pub fn rule_set_kinds(&self) -> Vec<RuleSetKind> {
        self.rule_sets.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn facts(location: Location, amount: i64, yield_rate: Decimal, months: i64) -> InstrumentFacts {
        InstrumentFacts {
            amount: Decimal::from(amount),
            location,
            yield_rate,
            months_passed: months,
            status: SavingsStatus::Active,
        }
    }

    fn keys(advice: &[Advice]) -> Vec<&'static str> {
        advice.iter().map(|a| a.key).collect()
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_set_kinds(),
            vec![
                RuleSetKind::Location,
                RuleSetKind::AmountTier,
                RuleSetKind::CrossCutting
            ]
        );
    }

    #[test]
    fn test_low_bank_yield_without_inactive_erosion() {
        let engine = InsightEngine::new();
        let date = (now() - Duration::days(8 * 30 + 3)).date_naive();
        let instrument_facts = InstrumentFacts::new(
            Decimal::from(3000),
            Location::from_label("בנק"),
            Decimal::new(5, 1),
            date,
            SavingsStatus::Active,
            now(),
        );
        assert_eq!(instrument_facts.months_passed, 8);

        let advice = engine.analyze(&instrument_facts);
        assert_eq!(
            keys(&advice),
            vec!["bank.base", "bank.low_yield", "tier.emergency", "cross.low_yield"]
        );
        assert!(!keys(&advice).contains(&"cross.inactive_erosion"));
        assert!(!keys(&advice).contains(&"bank.inactive"));
    }

    #[test]
    fn test_diversification_for_any_location() {
        let engine = InsightEngine::new();
        let mut locations = Location::known().to_vec();
        locations.push(Location::Other("שונות".into()));

        for location in locations {
            let advice = engine.analyze(&facts(location.clone(), 90000, Decimal::from(3), 5));
            assert!(
                keys(&advice).contains(&"cross.diversify"),
                "no diversification advice for {:?}",
                location
            );
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2022, 6, 15).unwrap();
        let run = |engine: &InsightEngine| {
            engine.insights_for(
                Decimal::new(1250050, 2),
                Location::ProvidentFund,
                Decimal::new(25, 1),
                date,
                SavingsStatus::Active,
                now(),
            )
        };
        let engine = InsightEngine::new();
        let first = run(&engine);
        assert!(first.len() >= 3);
        assert_eq!(first, run(&engine));
        assert_eq!(first, run(&InsightEngine::new()));
    }

    #[test]
    fn test_never_empty() {
        let engine = InsightEngine::new();
        let advice = engine.analyze(&facts(Location::Other(String::new()), 0, Decimal::ZERO, 0));
        assert_eq!(
            keys(&advice),
            vec!["fallback.advisor", "tier.starter", "cross.tiny_balance"]
        );
    }

    #[test]
    fn test_future_start_date_counts_negative_months() {
        let engine = InsightEngine::new();
        let date = (now() + Duration::days(65)).date_naive();
        let messages = engine.insights_for(
            Decimal::from(30000),
            Location::Pension,
            Decimal::from(4),
            date,
            SavingsStatus::Active,
            now(),
        );
        // Negative months still count as "new" savings
        assert!(messages.iter().any(|m| m.contains("(-3 months)")));
    }
}
