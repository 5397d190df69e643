//! Report command implementations (summary, insights, sync)

use anyhow::Result;
use rust_decimal::Decimal;

use nestegg_core::gateway::SyncReport;
use nestegg_core::insights::portfolio_advice;
use nestegg_core::models::{Record, SavingsInstrument, Transaction};
use nestegg_core::money::format_rate;
use nestegg_core::FinancialSummary;

use super::core::{load_book, shekels, AppContext};
use super::{severity_icon, truncate};

/// None when the session expired while loading; the user has been told to log in again
pub(crate) async fn build_summary(ctx: &mut AppContext) -> Result<Option<FinancialSummary>> {
    let was_authenticated = ctx.session.is_authenticated();
    let transactions = load_book::<Transaction>(ctx).await?;
    if was_authenticated && !ctx.session.is_authenticated() {
        // Savings would now load from local drafts and mix with server data
        return Ok(None);
    }
    let savings = load_book::<SavingsInstrument>(ctx).await?;
    Ok(Some(FinancialSummary::from_records(
        transactions.records(),
        savings.records(),
    )))
}

pub async fn cmd_summary(ctx: &mut AppContext, json: bool) -> Result<()> {
    let Some(summary) = build_summary(ctx).await? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    ctx.print_mode();
    println!();
    println!("📊 Financial Summary");
    println!("   ─────────────────────────────────────────");
    println!("   Total savings:      {:>16}", shekels(summary.total_savings));
    println!("   Average yield:      {:>15}%", format_rate(summary.average_yield_rate));
    println!(
        "   Active instruments: {:>16}",
        format!("{} of {}", summary.active_count, summary.instrument_count)
    );
    println!();
    println!("   Income:             {:>16}", shekels(summary.total_income));
    println!("   Expenses:           {:>16}", shekels(summary.total_expenses));

    let balance = if summary.balance < Decimal::ZERO {
        format!("\x1b[31m{:>16}\x1b[0m", shekels(summary.balance))
    } else {
        format!("\x1b[32m{:>16}\x1b[0m", shekels(summary.balance))
    };
    println!("   Balance:            {}", balance);

    if !summary.expense_by_category.is_empty() {
        println!();
        println!("   Expenses by category:");
        for (category, amount) in summary.expense_by_category.iter() {
            let pct = if summary.total_expenses > Decimal::ZERO {
                (amount / summary.total_expenses * Decimal::ONE_HUNDRED).round_dp(0)
            } else {
                Decimal::ZERO
            };
            println!(
                "   {:<20} {:>14} {:>4}%",
                truncate(category, 20),
                shekels(amount),
                pct
            );
        }
        println!();
        println!(
            "   Top category: {} ({})",
            summary.top_expense_category,
            shekels(summary.top_expense_amount)
        );
    }

    Ok(())
}

pub async fn cmd_insights(ctx: &mut AppContext, json: bool) -> Result<()> {
    let Some(summary) = build_summary(ctx).await? else {
        return Ok(());
    };
    let advice = portfolio_advice(&summary);

    if json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }

    println!();
    println!("🌱 Your progress");
    println!("   {}", advice.progress);
    println!();
    println!("💡 Recommendations");
    println!("   ─────────────────────────────────────────");
    for recommendation in &advice.recommendations {
        println!(
            "   {} {}",
            severity_icon(recommendation.severity),
            recommendation.message
        );
    }

    Ok(())
}

fn print_sync_report<R: Record>(label: &str, report: &SyncReport<R>) {
    if report.is_empty() {
        return;
    }
    println!("   {}: {} uploaded", label, report.uploaded.len());
    for (id, err) in &report.failed {
        println!("   ⚠️  [{}] stayed on this device: {}", id, err.notice());
    }
    for (id, err) in &report.uncleared {
        println!(
            "   ⚠️  [{}] was uploaded but its local copy could not be removed: {}",
            id,
            err.notice()
        );
        println!("      It will be uploaded again on the next sync unless removed from the drafts file.");
    }
}

/// Upload records saved while logged out
pub async fn cmd_sync(ctx: &mut AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in. Log in first, then run 'nestegg sync'.");
        return Ok(());
    }

    let mut transactions = ctx.book::<Transaction>();
    let tx_report = match transactions.upload_local_drafts(&mut ctx.session).await {
        Ok(report) => report,
        Err(e) => return ctx.report(&e),
    };

    let mut savings = ctx.book::<SavingsInstrument>();
    let savings_report = match savings.upload_local_drafts(&mut ctx.session).await {
        Ok(report) => report,
        Err(e) => {
            print_sync_report("Transactions", &tx_report);
            return ctx.report(&e);
        }
    };

    let total = tx_report.uploaded.len()
        + tx_report.failed.len()
        + savings_report.uploaded.len()
        + savings_report.failed.len();
    if total == 0 {
        println!("✨ Nothing to sync; no records are waiting on this device.");
        return Ok(());
    }

    println!("🔄 Sync complete");
    print_sync_report("Transactions", &tx_report);
    print_sync_report("Savings", &savings_report);
    Ok(())
}
