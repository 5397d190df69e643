//! Transaction command implementations

use anyhow::Result;

use nestegg_core::aggregate::{categories, filter_transactions, TransactionFilter};
use nestegg_core::models::{
    Origin, Record, RecordId, Transaction, TransactionDraft, TransactionType,
};
use nestegg_core::Error;

use super::core::{
    date_or_today, load_book, parse_amount, parse_date, parse_kind, shekels, AppContext,
};
use super::truncate;

/// Fields given to `tx edit`; unset fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl TransactionChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    pub fn apply(&self, mut draft: TransactionDraft) -> Result<TransactionDraft> {
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(amount) = &self.amount {
            draft.amount = parse_amount(amount)?;
        }
        if let Some(kind) = &self.kind {
            draft.kind = parse_kind(kind)?;
        }
        if let Some(category) = &self.category {
            draft.category = category.clone();
        }
        if let Some(date) = &self.date {
            draft.date = parse_date(date)?;
        }
        Ok(draft)
    }
}

/// Build a draft from `tx add` arguments
pub fn transaction_draft(
    description: &str,
    amount: &str,
    kind: &str,
    category: &str,
    date: Option<&str>,
) -> Result<TransactionDraft> {
    Ok(TransactionDraft {
        description: description.to_string(),
        amount: parse_amount(amount)?,
        kind: parse_kind(kind)?,
        category: category.to_string(),
        date: date_or_today(date)?,
    })
}

fn print_transaction(tx: &Transaction) {
    let amount_str = match tx.kind {
        TransactionType::Expense => format!("\x1b[31m-{}\x1b[0m", shekels(tx.amount)), // Red for expenses
        TransactionType::Income => format!("\x1b[32m+{}\x1b[0m", shekels(tx.amount)), // Green for income
    };
    let marker = if tx.origin == Origin::Local { "💾" } else { "  " };

    println!(
        "   {} {} │ {:>14} │ {:<12} │ {} [{}]",
        marker,
        tx.date,
        amount_str,
        truncate(&tx.category, 12),
        truncate(&tx.description, 32),
        tx.id
    );
}

pub async fn cmd_tx_list(ctx: &mut AppContext, filter: &TransactionFilter) -> Result<()> {
    let book = load_book::<Transaction>(ctx).await?;
    ctx.print_mode();

    if book.is_empty() {
        println!("No transactions yet. Add one with:");
        println!("  nestegg tx add --description Salary --amount 5000 --type income --category Work");
        return Ok(());
    }

    let matching = filter_transactions(book.records(), filter);

    println!();
    println!("📝 Transactions ({} of {})", matching.len(), book.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if matching.is_empty() {
        println!("   No transactions match the filter.");
    }
    for tx in matching {
        print_transaction(tx);
    }

    let all_categories = categories(book.records());
    if !all_categories.is_empty() {
        println!();
        println!("   Categories: {}", all_categories.join(", "));
    }

    Ok(())
}

pub async fn cmd_tx_add(ctx: &mut AppContext, draft: &TransactionDraft) -> Result<()> {
    let mut book = ctx.book::<Transaction>();
    match book.add(&mut ctx.session, draft).await {
        Ok(tx) => {
            println!("✅ Added transaction [{}]", tx.id);
            print_transaction(&tx);
            ctx.print_mode();
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub async fn cmd_tx_edit(ctx: &mut AppContext, id: &str, changes: &TransactionChanges) -> Result<()> {
    if changes.is_empty() {
        println!("Nothing to change. Pass at least one field, e.g. --amount 120");
        return Ok(());
    }

    let id = RecordId::new(id);
    let mut book = load_book::<Transaction>(ctx).await?;
    let Some(current) = book.get(&id) else {
        return ctx.report(&Error::NotFound(format!("Transaction {}", id)));
    };
    let draft = changes.apply(current.to_draft())?;

    match book.edit(&mut ctx.session, &id, &draft).await {
        Ok(tx) => {
            println!("✅ Updated transaction [{}]", tx.id);
            print_transaction(&tx);
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub async fn cmd_tx_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = RecordId::new(id);
    let mut book = ctx.book::<Transaction>();
    match book.remove(&mut ctx.session, &id).await {
        Ok(()) => println!("🗑️  Deleted transaction [{}]", id),
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}
