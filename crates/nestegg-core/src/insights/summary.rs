//! Portfolio advice
//!
//! Whole-portfolio remarks computed from a [`FinancialSummary`]: a short
//! progress note followed by recommendations in a fixed order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::FinancialSummary;
use crate::money::{format_amount, format_rate};

use super::types::{Advice, Severity};

/// Savings share of income used for goals and potential
const SAVINGS_SHARE_PERCENT: i64 = 10;
/// Expenses above this share of income are flagged
const EXPENSE_WARNING_PERCENT: i64 = 80;
/// Typical market yield, in percent
const MARKET_YIELD: i64 = 5;
/// Debt-to-income ceiling, in percent
const DTI_LIMIT_PERCENT: i64 = 36;
/// Share of total expenses one transaction must exceed to stand out
const OUTLIER_SHARE_PERCENT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioAdvice {
    pub progress: String,
    pub recommendations: Vec<Advice>,
}

fn percent(value: Decimal, pct: i64) -> Decimal {
    value.saturating_mul(Decimal::from(pct)) / Decimal::ONE_HUNDRED
}

fn progress_note(summary: &FinancialSummary) -> String {
    let mut note = if summary.total_savings > Decimal::ZERO {
        format!(
            "Well done! You have saved {} ₪, which shows real financial discipline.",
            format_amount(summary.total_savings)
        )
    } else {
        "You are at the start of your savings journey. Every small step counts.".to_string()
    };

    note.push(' ');
    if summary.balance > Decimal::ZERO {
        note.push_str(&format!(
            "Your positive balance ({} ₪) shows you keep expenses under control.",
            format_amount(summary.balance)
        ));
    } else if summary.balance < Decimal::ZERO {
        note.push_str(&format!(
            "Your balance ({} ₪) leaves room for improvement. Look for expenses to cut.",
            format_amount(summary.balance)
        ));
    } else {
        note.push_str("Your income and expenses are even, a good starting point.");
    }
    note
}

fn advice(key: &'static str, severity: Severity, message: String) -> Advice {
    Advice {
        key,
        severity,
        message,
    }
}

/// Progress note and recommendations for the whole portfolio
pub fn portfolio_advice(summary: &FinancialSummary) -> PortfolioAdvice {
    let mut recs = Vec::new();

    if summary.total_savings > Decimal::ZERO {
        recs.push(advice(
            "summary.savings_mix",
            Severity::Info,
            format!(
                "You have {} active savings. If the average yield ({}%) trails the market, \
                 look into higher-yield funds.",
                summary.active_count,
                format_rate(summary.average_yield_rate)
            ),
        ));
    } else {
        recs.push(advice(
            "summary.start_saving",
            Severity::Attention,
            "You have not added any savings yet. Start small, for example with an education \
             fund or a bank savings account."
                .to_string(),
        ));
    }

    if summary.top_expense_amount > Decimal::ZERO {
        recs.push(advice(
            "summary.top_category",
            Severity::Info,
            format!(
                "Your largest expense category is \"{}\" ({} ₪). Look for ways to reduce it, \
                 such as a budget or cheaper alternatives.",
                summary.top_expense_category,
                format_amount(summary.top_expense_amount)
            ),
        ));
    }

    if summary.total_expenses > percent(summary.total_income, EXPENSE_WARNING_PERCENT) {
        recs.push(advice(
            "summary.high_expenses",
            Severity::Warning,
            format!(
                "Your expenses ({} ₪) are close to or above your income ({} ₪). \
                 A monthly budget will help you track and trim non-essential spending.",
                format_amount(summary.total_expenses),
                format_amount(summary.total_income)
            ),
        ));
    }

    recs.push(advice(
        "summary.monthly_goal",
        Severity::Info,
        format!(
            "Set a monthly savings goal, for example {}% of your income, and use reminders \
             to stay on track.",
            SAVINGS_SHARE_PERCENT
        ),
    ));

    if summary.balance < Decimal::ZERO {
        recs.push(advice(
            "summary.debt_to_income",
            Severity::Warning,
            format!(
                "Your negative balance ({} ₪) may point to a high debt-to-income ratio. \
                 Divide your annual expenses by your annual income ({} ₪) and compare \
                 the result to {}%. Pay off high-interest debt first.",
                format_amount(summary.balance),
                format_amount(summary.total_income.saturating_mul(Decimal::from(12))),
                DTI_LIMIT_PERCENT
            ),
        ));
    }

    if summary.average_yield_rate > Decimal::ZERO
        && summary.average_yield_rate < Decimal::from(MARKET_YIELD)
    {
        recs.push(advice(
            "summary.below_market",
            Severity::Attention,
            format!(
                "Your average yearly yield ({}%) is below the typical market yield (about {}%). \
                 Consider an investment advisor, stocks or government bonds.",
                format_rate(summary.average_yield_rate),
                MARKET_YIELD
            ),
        ));
    }

    if summary.transaction_count > 0 {
        let divisor = Decimal::from(summary.expense_count.max(1));
        let threshold = percent(summary.total_expenses, OUTLIER_SHARE_PERCENT) / divisor;
        recs.push(advice(
            "summary.outliers",
            Severity::Info,
            format!(
                "You have {} expense transactions. Expenses above {} ₪ stand out; \
                 review them and see which can be reduced.",
                summary.expense_count,
                format_amount(threshold)
            ),
        ));
    }

    if summary.total_income > Decimal::ZERO {
        recs.push(advice(
            "summary.savings_potential",
            Severity::Info,
            format!(
                "Saving {}% of your income ({} ₪) would put {} ₪ aside. \
                 A long-term plan with guaranteed interest can grow it further.",
                SAVINGS_SHARE_PERCENT,
                format_amount(summary.total_income),
                format_amount(percent(summary.total_income, SAVINGS_SHARE_PERCENT))
            ),
        ));
    }

    PortfolioAdvice {
        progress: progress_note(summary),
        recommendations: recs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Location, Origin, RecordId, SavingsInstrument, SavingsStatus, Transaction,
        TransactionType,
    };
    use chrono::NaiveDate;

    fn tx(amount: i64, kind: TransactionType, category: &str) -> Transaction {
        Transaction {
            id: RecordId::from("t"),
            origin: Origin::Remote,
            description: String::new(),
            amount: Decimal::from(amount),
            kind,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn saving(amount: i64, yield_rate: Decimal) -> SavingsInstrument {
        SavingsInstrument {
            id: RecordId::from("s"),
            origin: Origin::Remote,
            name: "fund".to_string(),
            amount: Decimal::from(amount),
            location: Location::Bank,
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            yield_rate,
            status: SavingsStatus::Active,
        }
    }

    fn keys(advice: &PortfolioAdvice) -> Vec<&'static str> {
        advice.recommendations.iter().map(|a| a.key).collect()
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = FinancialSummary::from_records(&[], &[]);
        let advice = portfolio_advice(&summary);
        assert!(advice.progress.starts_with("You are at the start"));
        assert!(advice.progress.contains("even"));
        assert_eq!(keys(&advice), vec!["summary.start_saving", "summary.monthly_goal"]);
    }

    #[test]
    fn test_overspending_portfolio() {
        let txs = vec![
            tx(5000, TransactionType::Income, "salary"),
            tx(4500, TransactionType::Expense, "rent"),
            tx(1500, TransactionType::Expense, "food"),
        ];
        let instruments = vec![saving(10000, Decimal::from(3))];
        let summary = FinancialSummary::from_records(&txs, &instruments);
        let advice = portfolio_advice(&summary);

        assert!(advice.progress.contains("10,000 ₪"));
        assert!(advice.progress.contains("-1,000 ₪"));
        assert_eq!(
            keys(&advice),
            vec![
                "summary.savings_mix",
                "summary.top_category",
                "summary.high_expenses",
                "summary.monthly_goal",
                "summary.debt_to_income",
                "summary.below_market",
                "summary.outliers",
                "summary.savings_potential",
            ]
        );
        let top = &advice.recommendations[1];
        assert!(top.message.contains("\"rent\" (4,500 ₪)"));
        // 20% of 6000 spread over 2 expenses
        assert!(advice.recommendations[6].message.contains("600 ₪"));
        assert!(advice.recommendations[7].message.contains("500 ₪ aside"));
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let big = |s: &str| Decimal::from_scientific(s).unwrap();
        let mut income = tx(0, TransactionType::Income, "salary");
        income.amount = big("1e28");
        let mut expense = tx(0, TransactionType::Expense, "rent");
        expense.amount = big("2e28");
        let summary = FinancialSummary::from_records(&[income, expense], &[]);

        let advice = portfolio_advice(&summary);
        assert!(keys(&advice).contains(&"summary.debt_to_income"));
        assert!(keys(&advice).contains(&"summary.savings_potential"));
        assert!(keys(&advice).contains(&"summary.high_expenses"));
    }
}
