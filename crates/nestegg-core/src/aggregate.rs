//! Aggregation over transactions and savings instruments
//!
//! Everything here is pure and total: empty inputs produce zeros, never
//! errors. Malformed amounts were already coerced to zero when the records
//! were read.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{SavingsInstrument, SavingsStatus, Transaction, TransactionType};
use crate::money::saturating_sum;

/// Sum of instrument balances
pub fn total_amount(instruments: &[SavingsInstrument]) -> Decimal {
    saturating_sum(instruments.iter().map(|s| s.amount))
}

/// Sum of transaction amounts of one type
pub fn total_by_type(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount),
    )
}

/// Income minus expenses
pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Income)
        .saturating_sub(total_by_type(transactions, TransactionType::Expense))
}

/// Mean yield rate in percent, rounded to two decimals (0 when empty)
pub fn average_yield_rate(instruments: &[SavingsInstrument]) -> Decimal {
    if instruments.is_empty() {
        return Decimal::ZERO;
    }
    let sum = saturating_sum(instruments.iter().map(|s| s.yield_rate));
    (sum / Decimal::from(instruments.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of instruments still being contributed to
pub fn active_count(instruments: &[SavingsInstrument]) -> usize {
    instruments
        .iter()
        .filter(|s| s.status == SavingsStatus::Active)
        .count()
}

/// Number of expense transactions
pub fn expense_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
        .count()
}

/// Distinct categories in first-seen order
pub fn categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for t in transactions {
        if !seen.iter().any(|c| c == &t.category) {
            seen.push(t.category.clone());
        }
    }
    seen
}

/// Expense totals per category, in first-seen category order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals(Vec<(String, Decimal)>);

impl CategoryTotals {
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(c, a)| (c.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, amount) in &self.0 {
            map.serialize_entry(category, &amount.to_string())?;
        }
        map.end()
    }
}

/// Expense sums grouped by category.
///
/// Keys are every category seen across all transactions, so a category that
/// only has income maps to zero.
pub fn expense_by_category(transactions: &[Transaction]) -> CategoryTotals {
    categories(transactions)
        .into_iter()
        .map(|category| {
            let spent = saturating_sum(
                transactions
                    .iter()
                    .filter(|t| t.kind == TransactionType::Expense && t.category == category)
                    .map(|t| t.amount),
            );
            (category, spent)
        })
        .collect()
}

/// Category with the largest expense total.
///
/// Ties go to the category seen first. Returns `("", 0)` when no category
/// has a positive total.
pub fn top_expense_category(totals: &CategoryTotals) -> (String, Decimal) {
    let mut top = (String::new(), Decimal::ZERO);
    for (category, amount) in totals.iter() {
        if amount > top.1 {
            top = (category.to_string(), amount);
        }
    }
    top
}

/// Transaction list filter
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Exact date
    pub date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        let search_ok = match self.search.as_deref() {
            Some(q) if !q.is_empty() => t.description.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(c) if !c.is_empty() => t.category == c,
            _ => true,
        };
        let date_ok = self.date.map_or(true, |d| t.date == d);
        search_ok && category_ok && date_ok
    }
}

/// Transactions matching every set criterion, in their original order
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| filter.matches(t)).collect()
}

/// Everything the summary and insights views display
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_savings: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub average_yield_rate: Decimal,
    pub active_count: usize,
    pub instrument_count: usize,
    pub transaction_count: usize,
    pub expense_count: usize,
    pub expense_by_category: CategoryTotals,
    pub top_expense_category: String,
    pub top_expense_amount: Decimal,
}

impl FinancialSummary {
    pub fn from_records(transactions: &[Transaction], instruments: &[SavingsInstrument]) -> Self {
        let total_income = total_by_type(transactions, TransactionType::Income);
        let total_expenses = total_by_type(transactions, TransactionType::Expense);
        let by_category = expense_by_category(transactions);
        let (top_category, top_amount) = top_expense_category(&by_category);

        Self {
            total_savings: total_amount(instruments),
            total_income,
            total_expenses,
            balance: total_income.saturating_sub(total_expenses),
            average_yield_rate: average_yield_rate(instruments),
            active_count: active_count(instruments),
            instrument_count: instruments.len(),
            transaction_count: transactions.len(),
            expense_count: expense_count(transactions),
            expense_by_category: by_category,
            top_expense_category: top_category,
            top_expense_amount: top_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Origin, RecordId};

    fn tx(amount: i64, kind: TransactionType, category: &str) -> Transaction {
        Transaction {
            id: RecordId::new(format!("{}-{}", category, amount)),
            origin: Origin::Remote,
            description: format!("{} purchase", category),
            amount: Decimal::from(amount),
            kind,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn instrument(amount: i64, yield_rate: Decimal, status: SavingsStatus) -> SavingsInstrument {
        SavingsInstrument {
            id: RecordId::new("s"),
            origin: Origin::Remote,
            name: "Fund".into(),
            amount: Decimal::from(amount),
            location: Location::Bank,
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            yield_rate,
            status,
        }
    }

    #[test]
    fn test_income_expense_balance() {
        let txs = vec![
            tx(5000, TransactionType::Income, "Salary"),
            tx(2000, TransactionType::Expense, "Rent"),
            tx(1000, TransactionType::Expense, "Food"),
        ];
        assert_eq!(total_by_type(&txs, TransactionType::Income), Decimal::from(5000));
        assert_eq!(total_by_type(&txs, TransactionType::Expense), Decimal::from(3000));
        assert_eq!(balance(&txs), Decimal::from(2000));
    }

    #[test]
    fn test_balance_is_income_minus_expense() {
        let txs = vec![
            tx(120, TransactionType::Expense, "Food"),
            tx(75, TransactionType::Income, "Gift"),
            tx(33, TransactionType::Expense, "Transport"),
        ];
        assert_eq!(
            balance(&txs),
            total_by_type(&txs, TransactionType::Income)
                - total_by_type(&txs, TransactionType::Expense)
        );
        assert_eq!(balance(&txs), Decimal::from(-78));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(total_amount(&[]), Decimal::ZERO);
        assert_eq!(average_yield_rate(&[]), Decimal::ZERO);
        assert_eq!(balance(&[]), Decimal::ZERO);
        assert_eq!(active_count(&[]), 0);
        assert_eq!(
            top_expense_category(&CategoryTotals::default()),
            (String::new(), Decimal::ZERO)
        );
    }

    #[test]
    fn test_average_yield_rounds_to_two_places() {
        let items = vec![
            instrument(100, Decimal::new(1, 0), SavingsStatus::Active),
            instrument(100, Decimal::new(2, 0), SavingsStatus::Active),
            instrument(100, Decimal::new(2, 0), SavingsStatus::Inactive),
        ];
        assert_eq!(average_yield_rate(&items), Decimal::new(167, 2));
        assert_eq!(active_count(&items), 2);
        assert_eq!(total_amount(&items), Decimal::from(300));
    }

    #[test]
    fn test_expense_by_category_includes_income_only_categories() {
        let txs = vec![
            tx(5000, TransactionType::Income, "Salary"),
            tx(300, TransactionType::Expense, "Food"),
            tx(200, TransactionType::Expense, "Food"),
        ];
        let totals = expense_by_category(&txs);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("Salary"), Some(Decimal::ZERO));
        assert_eq!(totals.get("Food"), Some(Decimal::from(500)));
    }

    #[test]
    fn test_top_expense_category_tie_goes_to_first_seen() {
        let txs = vec![
            tx(400, TransactionType::Expense, "Rent"),
            tx(400, TransactionType::Expense, "Travel"),
            tx(100, TransactionType::Expense, "Food"),
        ];
        let top = top_expense_category(&expense_by_category(&txs));
        assert_eq!(top, ("Rent".to_string(), Decimal::from(400)));
    }

    #[test]
    fn test_top_expense_category_ignores_zero_totals() {
        let txs = vec![tx(5000, TransactionType::Income, "Salary")];
        let top = top_expense_category(&expense_by_category(&txs));
        assert_eq!(top, (String::new(), Decimal::ZERO));
    }

    #[test]
    fn test_filter_transactions() {
        let mut txs = vec![
            tx(50, TransactionType::Expense, "Food"),
            tx(70, TransactionType::Expense, "Transport"),
            tx(90, TransactionType::Expense, "Food"),
        ];
        txs[2].description = "Weekly GROCERIES".into();
        txs[2].date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();

        let filter = TransactionFilter {
            search: Some("groceries".into()),
            ..Default::default()
        };
        assert_eq!(filter_transactions(&txs, &filter).len(), 1);

        let filter = TransactionFilter {
            category: Some("Food".into()),
            ..Default::default()
        };
        assert_eq!(filter_transactions(&txs, &filter).len(), 2);

        let filter = TransactionFilter {
            category: Some("Food".into()),
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        let found = filter_transactions(&txs, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, Decimal::from(50));

        assert_eq!(filter_transactions(&txs, &TransactionFilter::default()).len(), 3);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let txs = vec![
            tx(1, TransactionType::Expense, "B"),
            tx(2, TransactionType::Income, "A"),
            tx(3, TransactionType::Expense, "B"),
        ];
        assert_eq!(categories(&txs), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_financial_summary() {
        let txs = vec![
            tx(5000, TransactionType::Income, "Salary"),
            tx(2000, TransactionType::Expense, "Rent"),
            tx(1000, TransactionType::Expense, "Food"),
        ];
        let items = vec![
            instrument(3000, Decimal::new(5, 1), SavingsStatus::Active),
            instrument(7000, Decimal::new(35, 1), SavingsStatus::Inactive),
        ];
        let summary = FinancialSummary::from_records(&txs, &items);
        assert_eq!(summary.total_savings, Decimal::from(10000));
        assert_eq!(summary.balance, Decimal::from(2000));
        assert_eq!(summary.average_yield_rate, Decimal::from(2));
        assert_eq!(summary.active_count, 1);
        assert_eq!(summary.expense_count, 2);
        assert_eq!(summary.top_expense_category, "Rent");
        assert_eq!(summary.top_expense_amount, Decimal::from(2000));
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let mut a = instrument(0, huge, SavingsStatus::Active);
        a.amount = huge;
        let items = vec![a.clone(), a];
        assert_eq!(total_amount(&items), Decimal::MAX);
        assert!(average_yield_rate(&items) > Decimal::ZERO);

        let mut income = tx(0, TransactionType::Income, "Salary");
        income.amount = huge;
        let mut expense = tx(0, TransactionType::Expense, "Rent");
        expense.amount = huge;
        let txs = vec![
            income.clone(),
            income,
            expense.clone(),
            expense.clone(),
            expense,
        ];
        assert_eq!(total_by_type(&txs, TransactionType::Income), Decimal::MAX);
        assert_eq!(expense_by_category(&txs).get("Rent"), Some(Decimal::MAX));
        assert_eq!(balance(&txs), Decimal::ZERO);

        let summary = FinancialSummary::from_records(&txs, &items);
        assert_eq!(summary.total_savings, Decimal::MAX);
        assert_eq!(summary.top_expense_amount, Decimal::MAX);
    }
}
