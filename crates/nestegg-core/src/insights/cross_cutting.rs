//! Rules that apply to every instrument regardless of location

use super::engine::RuleSet;
use super::types::{Advice, InstrumentFacts, Rule, RuleSetKind, Severity};

pub struct CrossCuttingRules {
    rules: Vec<Rule>,
}

impl CrossCuttingRules {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule::new(
                    "cross.strong_yield",
                    Severity::Info,
                    |f| f.yield_above(5) && f.is_active(),
                    |f| {
                        format!(
                            "A {}% yield on active savings is excellent. Keep tracking it.",
                            f.rate_text()
                        )
                    },
                ),
                Rule::new(
                    "cross.inactive_erosion",
                    Severity::Warning,
                    |f| f.is_inactive() && f.months_passed > 12,
                    |f| {
                        format!(
                            "Savings inactive for {} months lose value to 2-3% yearly inflation. \
                             Reactivate or transfer them.",
                            f.months_passed
                        )
                    },
                ),
                Rule::new(
                    "cross.diversify",
                    Severity::Warning,
                    |f| f.amount_above(85000),
                    |f| {
                        format!(
                            "A high balance ({} ₪) should be split across institutions for protection.",
                            f.amount_text()
                        )
                    },
                ),
                Rule::new(
                    "cross.low_yield",
                    Severity::Attention,
                    |f| f.yield_below(2) && f.months_passed > 6,
                    |f| {
                        format!(
                            "A low yield ({}%) after {} months. Consider a transfer.",
                            f.rate_text(),
                            f.months_passed
                        )
                    },
                ),
                Rule::new(
                    "cross.large_high_yield",
                    Severity::Attention,
                    |f| f.amount_above(100000) && f.yield_above(8),
                    |f| {
                        format!(
                            "A {}% yield on {} ₪ is excellent. Check the risk and the diversification.",
                            f.rate_text(),
                            f.amount_text()
                        )
                    },
                ),
                Rule::new(
                    "cross.long_running",
                    Severity::Info,
                    |f| f.months_passed > 36 && f.is_active(),
                    |f| {
                        format!(
                            "This savings has been active for {} months. If the yield is low it may be losing to inflation.",
                            f.months_passed
                        )
                    },
                ),
                Rule::new(
                    "cross.tiny_balance",
                    Severity::Attention,
                    |f| f.amount_below(500) && f.is_active(),
                    |f| {
                        format!(
                            "{} ₪ is a very small amount. Small regular deposits build the saving habit.",
                            f.amount_text()
                        )
                    },
                ),
            ],
        }
    }
}

impl Default for CrossCuttingRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for CrossCuttingRules {
    fn id(&self) -> RuleSetKind {
        RuleSetKind::CrossCutting
    }

    fn name(&self) -> &'static str {
        "Cross-cutting"
    }

    fn evaluate(&self, facts: &InstrumentFacts) -> Vec<Advice> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(facts))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, SavingsStatus};
    use rust_decimal::Decimal;

    fn keys(facts: &InstrumentFacts) -> Vec<&'static str> {
        CrossCuttingRules::new()
            .evaluate(facts)
            .into_iter()
            .map(|a| a.key)
            .collect()
    }

    #[test]
    fn test_inactive_erosion_needs_a_year() {
        let mut facts = InstrumentFacts {
            amount: Decimal::from(3000),
            location: Location::Pension,
            yield_rate: Decimal::from(3),
            months_passed: 12,
            status: SavingsStatus::Inactive,
        };
        assert!(keys(&facts).is_empty());

        facts.months_passed = 13;
        assert_eq!(keys(&facts), vec!["cross.inactive_erosion"]);
    }

    #[test]
    fn test_large_high_yield_active() {
        let facts = InstrumentFacts {
            amount: Decimal::from(150000),
            location: Location::InvestmentPortfolio,
            yield_rate: Decimal::from(9),
            months_passed: 40,
            status: SavingsStatus::Active,
        };
        assert_eq!(
            keys(&facts),
            vec![
                "cross.strong_yield",
                "cross.diversify",
                "cross.large_high_yield",
                "cross.long_running",
            ]
        );
    }

    #[test]
    fn test_tiny_balance_only_when_active() {
        let mut facts = InstrumentFacts {
            amount: Decimal::from(100),
            location: Location::Bank,
            yield_rate: Decimal::from(3),
            months_passed: 1,
            status: SavingsStatus::Active,
        };
        assert_eq!(keys(&facts), vec!["cross.tiny_balance"]);

        facts.status = SavingsStatus::Inactive;
        assert!(keys(&facts).is_empty());
    }

    #[test]
    fn test_low_yield_and_long_running_boundaries() {
        let mut facts = InstrumentFacts {
            amount: Decimal::from(3000),
            location: Location::Bank,
            yield_rate: Decimal::new(199, 2),
            months_passed: 7,
            status: SavingsStatus::Active,
        };
        assert_eq!(keys(&facts), vec!["cross.low_yield"]);
        facts.months_passed = 6;
        assert!(keys(&facts).is_empty());

        facts.yield_rate = Decimal::from(3);
        facts.months_passed = 37;
        assert_eq!(keys(&facts), vec!["cross.long_running"]);
        facts.months_passed = 36;
        assert!(keys(&facts).is_empty());
    }

    #[test]
    fn test_diversify_and_strong_yield_boundaries() {
        let mut facts = InstrumentFacts {
            amount: Decimal::from(85001),
            location: Location::Pension,
            yield_rate: Decimal::new(501, 2),
            months_passed: 1,
            status: SavingsStatus::Active,
        };
        assert_eq!(keys(&facts), vec!["cross.strong_yield", "cross.diversify"]);

        facts.amount = Decimal::from(85000);
        facts.yield_rate = Decimal::from(5);
        assert!(keys(&facts).is_empty());
    }
}
