//! Amount tiers
//!
//! The tiers partition the balance into bands, so exactly one message is
//! produced for every instrument.

use super::engine::RuleSet;
use super::types::{Advice, InstrumentFacts, Rule, RuleSetKind, Severity};

pub struct AmountTierRules {
    /// Checked in order; the first match wins and the last entry always applies
    tiers: Vec<Rule>,
}

impl AmountTierRules {
    pub fn new() -> Self {
        Self {
            tiers: vec![
                Rule::new(
                    "tier.starter",
                    Severity::Attention,
                    |f| f.amount_below(1000),
                    |f| {
                        format!(
                            "{} ₪ is a short-term amount. Start saving 200-500 ₪ a month.",
                            f.amount_text()
                        )
                    },
                ),
                Rule::new(
                    "tier.emergency",
                    Severity::Info,
                    |f| f.amount_below(5000),
                    |f| {
                        format!(
                            "{} ₪ is a good base for an emergency fund. Add 10% of your monthly income.",
                            f.amount_text()
                        )
                    },
                ),
                Rule::new(
                    "tier.planning",
                    Severity::Info,
                    |f| f.amount_below(20000),
                    |f| {
                        format!(
                            "{} ₪ leaves room for planning. Consider an education fund or an investment.",
                            f.amount_text()
                        )
                    },
                ),
                Rule::always("tier.established", Severity::Info, |f| {
                    format!(
                        "{} ₪ is a successful savings. Protect it with insurance or stable assets.",
                        f.amount_text()
                    )
                }),
            ],
        }
    }
}

impl Default for AmountTierRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for AmountTierRules {
    fn id(&self) -> RuleSetKind {
        RuleSetKind::AmountTier
    }

    fn name(&self) -> &'static str {
        "Amount tier"
    }

    fn evaluate(&self, facts: &InstrumentFacts) -> Vec<Advice> {
        self.tiers
            .iter()
            .find_map(|rule| rule.evaluate(facts))
            .into_iter()
            .collect()
    }
}
