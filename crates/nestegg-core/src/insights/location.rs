//! Location rules
//!
//! Each known location has a base message that always fires, followed by
//! refinements for its own thresholds. Instruments at an unrecognized
//! location get a single fallback suggesting a financial advisor.

use crate::models::Location;

use super::engine::RuleSet;
use super::types::{Advice, InstrumentFacts, Rule, RuleSetKind, Severity};

/// Base rule plus refinements for one location
#[derive(Debug, Clone)]
pub struct LocationBlock {
    pub location: Location,
    pub base: Rule,
    pub refinements: Vec<Rule>,
}

impl LocationBlock {
    fn evaluate(&self, facts: &InstrumentFacts) -> Vec<Advice> {
        std::iter::once(&self.base)
            .chain(self.refinements.iter())
            .filter_map(|rule| rule.evaluate(facts))
            .collect()
    }
}

/// Rule set keyed by savings location
pub struct LocationRules {
    blocks: Vec<LocationBlock>,
    fallback: Rule,
}

impl LocationRules {
    pub fn new() -> Self {
        Self {
            blocks: vec![
                education_fund(),
                pension(),
                provident_fund(),
                bank(),
                general_savings(),
                investment_portfolio(),
            ],
            fallback: Rule::always("fallback.advisor", Severity::Info, |_| {
                "Consult a financial advisor to choose a strategy that fits this savings."
                    .to_string()
            }),
        }
    }

    /// The block for a location, if it is a known one
    pub fn block(&self, location: &Location) -> Option<&LocationBlock> {
        self.blocks.iter().find(|b| &b.location == location)
    }
}

impl Default for LocationRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for LocationRules {
    fn id(&self) -> RuleSetKind {
        RuleSetKind::Location
    }

    fn name(&self) -> &'static str {
        "Location"
    }

    fn evaluate(&self, facts: &InstrumentFacts) -> Vec<Advice> {
        match self.block(&facts.location) {
            Some(block) => block.evaluate(facts),
            None => self.fallback.evaluate(facts).into_iter().collect(),
        }
    }
}

fn education_fund() -> LocationBlock {
    LocationBlock {
        location: Location::EducationFund,
        base: Rule::always("education_fund.base", Severity::Info, |f| {
            format!(
                "An education fund is a mid-term vehicle, tax-exempt after 6 years. \
                 With {} ₪ saved, steady contributions will keep it growing.",
                f.amount_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "education_fund.high_yield",
                Severity::Info,
                |f| f.yield_above(3),
                |f| {
                    format!(
                        "A {}% yield is above average. Review the fund's investments with an expert.",
                        f.rate_text()
                    )
                },
            ),
            Rule::new(
                "education_fund.low_amount",
                Severity::Attention,
                |f| f.amount_below(5000),
                |f| {
                    format!(
                        "The balance is low ({} ₪). Set up an automatic deposit of 200-500 ₪ a month.",
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "education_fund.low_yield",
                Severity::Warning,
                |f| f.months_passed > 12 && f.yield_below(2),
                |f| {
                    format!(
                        "The yield is low ({}%) after {} months. Consider moving to a better performing fund.",
                        f.rate_text(),
                        f.months_passed
                    )
                },
            ),
        ],
    }
}

fn pension() -> LocationBlock {
    LocationBlock {
        location: Location::Pension,
        base: Rule::always("pension.base", Severity::Info, |f| {
            format!(
                "A pension is a long-term investment. With {} ₪ saved, aim to contribute 15% of your monthly income.",
                f.amount_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "pension.new",
                Severity::Attention,
                |f| f.months_passed < 12,
                |f| {
                    format!(
                        "This savings is new ({} months). Increase contributions for long-term stability.",
                        f.months_passed
                    )
                },
            ),
            Rule::new(
                "pension.low_yield",
                Severity::Warning,
                |f| f.amount_above(20000) && f.yield_below(3),
                |f| {
                    format!(
                        "A {}% yield on {} ₪ is low. Consider transferring or diversifying.",
                        f.rate_text(),
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "pension.inactive",
                Severity::Warning,
                |f| f.is_inactive(),
                |_| "An inactive pension may hurt your retirement plan.".to_string(),
            ),
        ],
    }
}

fn provident_fund() -> LocationBlock {
    LocationBlock {
        location: Location::ProvidentFund,
        base: Rule::always("provident_fund.base", Severity::Info, |f| {
            format!(
                "A provident fund is flexible and allows partial withdrawals. \
                 {} ₪ is a good start, but a {}% yield needs monitoring.",
                f.amount_text(),
                f.rate_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "provident_fund.low_amount",
                Severity::Attention,
                |f| f.amount_below(5000),
                |f| {
                    format!(
                        "The balance is low ({} ₪). Add a fixed monthly contribution.",
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "provident_fund.high_yield",
                Severity::Info,
                |f| f.yield_above(6),
                |f| {
                    format!(
                        "A high yield ({}%) points to good management. Hold it for the long term.",
                        f.rate_text()
                    )
                },
            ),
            Rule::new(
                "provident_fund.low_yield",
                Severity::Warning,
                |f| f.months_passed > 24 && f.yield_below(3),
                |f| {
                    format!(
                        "The yield is low ({}%) after {} months. Look into transferring the fund.",
                        f.rate_text(),
                        f.months_passed
                    )
                },
            ),
        ],
    }
}

fn bank() -> LocationBlock {
    LocationBlock {
        location: Location::Bank,
        base: Rule::always("bank.base", Severity::Info, |f| {
            format!(
                "Bank savings are safe but low-yield. {} ₪ deserves a smart allocation.",
                f.amount_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "bank.low_yield",
                Severity::Attention,
                |f| f.yield_below(1),
                |f| {
                    format!(
                        "A {}% yield is low. Consider a high-yield account or an investment.",
                        f.rate_text()
                    )
                },
            ),
            Rule::new(
                "bank.deposit_protection",
                Severity::Warning,
                |f| f.amount_above(85000),
                |f| {
                    format!(
                        "The balance is high ({} ₪). Split it between banks to keep it fully protected.",
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "bank.inactive",
                Severity::Warning,
                |f| f.is_inactive() && f.months_passed > 6,
                |f| {
                    format!(
                        "This savings has been inactive for {} months and is losing value to inflation.",
                        f.months_passed
                    )
                },
            ),
        ],
    }
}

fn general_savings() -> LocationBlock {
    LocationBlock {
        location: Location::GeneralSavings,
        base: Rule::always("general_savings.base", Severity::Info, |f| {
            format!(
                "General savings suit an emergency fund. With {} ₪, aim to cover 3-6 months of expenses.",
                f.amount_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "general_savings.low_amount",
                Severity::Attention,
                |f| f.amount_below(10000) && f.is_active(),
                |f| {
                    format!(
                        "{} ₪ is low for an emergency fund. Grow it with automatic saving.",
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "general_savings.low_yield",
                Severity::Warning,
                |f| f.months_passed > 12 && f.yield_below(2),
                |f| {
                    format!(
                        "A low yield ({}%) after {} months erodes the value of this savings.",
                        f.rate_text(),
                        f.months_passed
                    )
                },
            ),
            Rule::new(
                "general_savings.idle_cash",
                Severity::Attention,
                |f| f.amount_above(50000),
                |f| {
                    format!(
                        "A high balance ({} ₪) calls for smart investing rather than liquid savings.",
                        f.amount_text()
                    )
                },
            ),
        ],
    }
}

fn investment_portfolio() -> LocationBlock {
    LocationBlock {
        location: Location::InvestmentPortfolio,
        base: Rule::always("investment_portfolio.base", Severity::Info, |f| {
            format!(
                "An investment portfolio has high return potential. {} ₪ at {}% needs diversification.",
                f.amount_text(),
                f.rate_text()
            )
        }),
        refinements: vec![
            Rule::new(
                "investment_portfolio.high_yield",
                Severity::Attention,
                |f| f.yield_above(7),
                |f| {
                    format!(
                        "An excellent yield ({}%). Check the risk and spread holdings across stocks and bonds.",
                        f.rate_text()
                    )
                },
            ),
            Rule::new(
                "investment_portfolio.low_amount",
                Severity::Attention,
                |f| f.amount_below(1000),
                |f| {
                    format!(
                        "The balance is low ({} ₪). Start investing regularly in growth stocks.",
                        f.amount_text()
                    )
                },
            ),
            Rule::new(
                "investment_portfolio.low_yield",
                Severity::Warning,
                |f| f.months_passed > 18 && f.yield_below(4),
                |f| {
                    format!(
                        "The yield is low ({}%) after {} months. Consider changing strategy.",
                        f.rate_text(),
                        f.months_passed
                    )
                },
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SavingsStatus;
    use rust_decimal::Decimal;

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
    fn test_every_known_location_has_a_block() {
        let rules = LocationRules::new();
        for location in Location::known() {
            assert!(rules.block(location).is_some(), "missing {:?}", location);
        }
    }

    #[test]
    fn test_base_comes_first() {
        let rules = LocationRules::new();
        let advice = rules.evaluate(&facts(Location::Bank, 3000, Decimal::new(5, 1), 8));
        assert_eq!(keys(&advice), vec!["bank.base", "bank.low_yield"]);
        assert!(advice[0].message.contains("3,000 ₪"));
    }

    #[test]
    fn test_pension_refinements() {
        let rules = LocationRules::new();
        let mut f = facts(Location::Pension, 25000, Decimal::from(2), 3);
        f.status = SavingsStatus::Inactive;
        let advice = rules.evaluate(&f);
        assert_eq!(
            keys(&advice),
            vec!["pension.base", "pension.new", "pension.low_yield", "pension.inactive"]
        );
    }

    #[test]
    fn test_education_fund_thresholds_are_strict() {
        let rules = LocationRules::new();
        // Exactly at the thresholds: nothing beyond the base fires
        let advice = rules.evaluate(&facts(Location::EducationFund, 5000, Decimal::from(3), 12));
        assert_eq!(keys(&advice), vec!["education_fund.base"]);
    }

    #[test]
    fn test_unknown_location_falls_back() {
        let rules = LocationRules::new();
        let advice = rules.evaluate(&facts(
            Location::Other("crypto wallet".into()),
            3000,
            Decimal::ONE,
            2,
        ));
        assert_eq!(keys(&advice), vec!["fallback.advisor"]);
    }

    #[test]
    fn test_general_savings_inactive_skips_low_amount() {
        let rules = LocationRules::new();
        let mut f = facts(Location::GeneralSavings, 2000, Decimal::from(3), 1);
        f.status = SavingsStatus::Inactive;
        assert_eq!(keys(&rules.evaluate(&f)), vec!["general_savings.base"]);
    }

    fn rate(hundredths: i64) -> Decimal {
        Decimal::new(hundredths, 2)
    }

    fn evaluate(location: Location, amount: i64, yield_rate: Decimal, months: i64) -> Vec<&'static str> {
        keys(&LocationRules::new().evaluate(&facts(location, amount, yield_rate, months)))
    }

    #[test]
    fn test_education_fund_refinements() {
        use Location::EducationFund as Ef;
        assert_eq!(
            evaluate(Ef, 4999, rate(301), 13),
            vec!["education_fund.base", "education_fund.high_yield", "education_fund.low_amount"]
        );
        assert_eq!(
            evaluate(Ef, 5000, rate(199), 13),
            vec!["education_fund.base", "education_fund.low_yield"]
        );
        assert_eq!(evaluate(Ef, 5000, rate(199), 12), vec!["education_fund.base"]);
        assert_eq!(evaluate(Ef, 5000, rate(200), 13), vec!["education_fund.base"]);
    }

    #[test]
    fn test_provident_fund_refinements() {
        use Location::ProvidentFund as Pf;
        assert_eq!(
            evaluate(Pf, 4999, rate(601), 1),
            vec!["provident_fund.base", "provident_fund.low_amount", "provident_fund.high_yield"]
        );
        assert_eq!(evaluate(Pf, 5000, rate(600), 25), vec!["provident_fund.base"]);
        assert_eq!(
            evaluate(Pf, 5000, rate(299), 25),
            vec!["provident_fund.base", "provident_fund.low_yield"]
        );
        assert_eq!(evaluate(Pf, 5000, rate(299), 24), vec!["provident_fund.base"]);
        assert_eq!(evaluate(Pf, 5000, rate(300), 25), vec!["provident_fund.base"]);
    }

    #[test]
    fn test_investment_portfolio_refinements() {
        use Location::InvestmentPortfolio as Ip;
        assert_eq!(
            evaluate(Ip, 999, rate(701), 1),
            vec![
                "investment_portfolio.base",
                "investment_portfolio.high_yield",
                "investment_portfolio.low_amount",
            ]
        );
        assert_eq!(evaluate(Ip, 1000, rate(700), 19), vec!["investment_portfolio.base"]);
        assert_eq!(
            evaluate(Ip, 1000, rate(399), 19),
            vec!["investment_portfolio.base", "investment_portfolio.low_yield"]
        );
        assert_eq!(evaluate(Ip, 1000, rate(399), 18), vec!["investment_portfolio.base"]);
        assert_eq!(evaluate(Ip, 1000, rate(400), 19), vec!["investment_portfolio.base"]);
    }

    #[test]
    fn test_general_savings_refinements() {
        use Location::GeneralSavings as Gs;
        assert_eq!(
            evaluate(Gs, 9999, rate(300), 1),
            vec!["general_savings.base", "general_savings.low_amount"]
        );
        assert_eq!(
            evaluate(Gs, 10000, rate(199), 13),
            vec!["general_savings.base", "general_savings.low_yield"]
        );
        assert_eq!(evaluate(Gs, 10000, rate(199), 12), vec!["general_savings.base"]);
        assert_eq!(
            evaluate(Gs, 50001, rate(300), 1),
            vec!["general_savings.base", "general_savings.idle_cash"]
        );
        assert_eq!(evaluate(Gs, 50000, rate(300), 1), vec!["general_savings.base"]);
    }

    #[test]
    fn test_bank_refinements() {
        assert_eq!(
            evaluate(Location::Bank, 85001, rate(100), 1),
            vec!["bank.base", "bank.deposit_protection"]
        );
        assert_eq!(evaluate(Location::Bank, 85000, rate(100), 1), vec!["bank.base"]);

        let rules = LocationRules::new();
        let mut f = facts(Location::Bank, 3000, rate(100), 7);
        f.status = SavingsStatus::Inactive;
        assert_eq!(keys(&rules.evaluate(&f)), vec!["bank.base", "bank.inactive"]);
        f.months_passed = 6;
        assert_eq!(keys(&rules.evaluate(&f)), vec!["bank.base"]);
    }
}
