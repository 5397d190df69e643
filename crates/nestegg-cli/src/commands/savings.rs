//! Savings instrument commands

use anyhow::Result;
use chrono::Utc;

use nestegg_core::gateway::RecordBook;
use nestegg_core::insights::InsightEngine;
use nestegg_core::models::{Location, Origin, Record, RecordId, SavingsDraft, SavingsInstrument};
use nestegg_core::money::format_rate;
use nestegg_core::Error;

use super::core::{
    date_or_today, load_book, parse_amount, parse_date, parse_rate, parse_status, shekels,
    AppContext,
};
use super::{severity_icon, truncate};

/// Fields given to `savings edit`; unset fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct SavingsChanges {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub yield_rate: Option<String>,
    pub status: Option<String>,
}

impl SavingsChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.yield_rate.is_none()
            && self.status.is_none()
    }

    pub fn apply(&self, mut draft: SavingsDraft) -> Result<SavingsDraft> {
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(amount) = &self.amount {
            draft.amount = parse_amount(amount)?;
        }
        if let Some(location) = &self.location {
            draft.location = Location::from_label(location);
        }
        if let Some(date) = &self.date {
            draft.date = parse_date(date)?;
        }
        if let Some(rate) = &self.yield_rate {
            draft.yield_rate = parse_rate(rate)?;
        }
        if let Some(status) = &self.status {
            draft.status = parse_status(status)?;
        }
        Ok(draft)
    }
}

/// Build a draft from `savings add` arguments
pub fn savings_draft(
    name: &str,
    amount: &str,
    location: &str,
    date: Option<&str>,
    yield_rate: &str,
    status: &str,
) -> Result<SavingsDraft> {
    Ok(SavingsDraft {
        name: name.to_string(),
        amount: parse_amount(amount)?,
        location: Location::from_label(location),
        date: date_or_today(date)?,
        yield_rate: parse_rate(yield_rate)?,
        status: parse_status(status)?,
    })
}

fn print_instrument(instrument: &SavingsInstrument) {
    let marker = if instrument.origin == Origin::Local {
        "💾"
    } else {
        "  "
    };
    println!(
        "   {} {:<24} │ {:>12} │ {:<20} │ {:>6}% │ {:<8} │ since {} [{}]",
        marker,
        truncate(&instrument.name, 24),
        shekels(instrument.amount),
        truncate(instrument.location.display_name(), 20),
        format_rate(instrument.yield_rate),
        instrument.status.as_str(),
        instrument.date,
        instrument.id
    );
}

pub async fn cmd_savings_list(ctx: &mut AppContext) -> Result<()> {
    let book = load_book::<SavingsInstrument>(ctx).await?;
    ctx.print_mode();

    if book.is_empty() {
        println!("No savings instruments yet. Add one with:");
        println!("  nestegg savings add --name \"Emergency fund\" --amount 3000 --location bank --yield 0.5");
        return Ok(());
    }

    println!();
    println!("🏦 Savings ({})", book.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for instrument in book.records() {
        print_instrument(instrument);
    }

    println!();
    let known: Vec<&str> = Location::known().iter().map(|l| l.display_name()).collect();
    println!("   Locations: {}", known.join(", "));

    Ok(())
}

pub async fn cmd_savings_add(ctx: &mut AppContext, draft: &SavingsDraft) -> Result<()> {
    let mut book = ctx.book::<SavingsInstrument>();
    match book.add(&mut ctx.session, draft).await {
        Ok(instrument) => {
            println!("✅ Added savings instrument [{}]", instrument.id);
            print_instrument(&instrument);
            if let Location::Other(label) = &instrument.location {
                println!("   ℹ️  '{}' is not a known location; general advice will be used", label);
            }
            ctx.print_mode();
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub async fn cmd_savings_edit(ctx: &mut AppContext, id: &str, changes: &SavingsChanges) -> Result<()> {
    if changes.is_empty() {
        println!("Nothing to change. Pass at least one field, e.g. --yield 4.2");
        return Ok(());
    }

    let id = RecordId::new(id);
    let mut book = load_book::<SavingsInstrument>(ctx).await?;
    let Some(current) = book.get(&id) else {
        return ctx.report(&Error::NotFound(format!("Savings instrument {}", id)));
    };
    let draft = changes.apply(current.to_draft())?;

    match book.edit(&mut ctx.session, &id, &draft).await {
        Ok(instrument) => {
            println!("✅ Updated savings instrument [{}]", instrument.id);
            print_instrument(&instrument);
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub async fn cmd_savings_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = RecordId::new(id);
    let mut book = ctx.book::<SavingsInstrument>();
    match book.remove(&mut ctx.session, &id).await {
        Ok(()) => println!("🗑️  Deleted savings instrument [{}]", id),
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

fn print_advice(engine: &InsightEngine, instrument: &SavingsInstrument) {
    println!();
    println!(
        "💡 {} ({}, {})",
        instrument.name,
        instrument.location.display_name(),
        shekels(instrument.amount)
    );
    for advice in engine.instrument_advice(instrument, Utc::now()) {
        println!("   {} {}", severity_icon(advice.severity), advice.message);
    }
}

/// Advice for one instrument, or for every instrument when `id` is None
pub async fn cmd_savings_insights(ctx: &mut AppContext, id: Option<&str>) -> Result<()> {
    let book: RecordBook<SavingsInstrument> = load_book(ctx).await?;
    let engine = InsightEngine::new();

    match id {
        Some(id) => {
            let id = RecordId::new(id);
            match book.get(&id) {
                Some(instrument) => print_advice(&engine, instrument),
                None => ctx.report(&Error::NotFound(format!("Savings instrument {}", id)))?,
            }
        }
        None => {
            if book.is_empty() {
                println!("No savings instruments to analyze.");
                return Ok(());
            }
            for instrument in book.records() {
                print_advice(&engine, instrument);
            }
        }
    }
    Ok(())
}
