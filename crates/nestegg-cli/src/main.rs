//! Nestegg CLI - Personal finance client
//!
//! Usage:
//!   nestegg login -e EMAIL -p PASS     Log in to the finance API
//!   nestegg tx add ...                 Record income or an expense
//!   nestegg savings insights           Advice for each savings instrument
//!   nestegg summary                    Totals, balance and categories

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nestegg_core::TransactionFilter;

use cli::*;
use commands::{AppContext, SavingsChanges, TransactionChanges};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut ctx = AppContext::open(cli.api_url.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::cmd_login(&mut ctx, &email, &password).await
        }
        Commands::Register { email, password } => {
            commands::cmd_register(&mut ctx, &email, &password).await
        }
        Commands::Logout => commands::cmd_logout(&mut ctx),
        Commands::Whoami => commands::cmd_whoami(&mut ctx).await,
        Commands::Profile {
            first_name,
            last_name,
        } => commands::cmd_profile(&mut ctx, &first_name, &last_name).await,
        Commands::Tx { action } => match action {
            None => commands::cmd_tx_list(&mut ctx, &TransactionFilter::default()).await,
            Some(TxAction::List {
                search,
                category,
                date,
            }) => {
                let filter = TransactionFilter {
                    search,
                    category,
                    date: date.as_deref().map(commands::parse_date).transpose()?,
                };
                commands::cmd_tx_list(&mut ctx, &filter).await
            }
            Some(TxAction::Add {
                description,
                amount,
                kind,
                category,
                date,
            }) => {
                let draft = commands::transaction_draft(
                    &description,
                    &amount,
                    &kind,
                    &category,
                    date.as_deref(),
                )?;
                commands::cmd_tx_add(&mut ctx, &draft).await
            }
            Some(TxAction::Edit {
                id,
                description,
                amount,
                kind,
                category,
                date,
            }) => {
                let changes = TransactionChanges {
                    description,
                    amount,
                    kind,
                    category,
                    date,
                };
                commands::cmd_tx_edit(&mut ctx, &id, &changes).await
            }
            Some(TxAction::Delete { id }) => commands::cmd_tx_delete(&mut ctx, &id).await,
        },
        Commands::Savings { action } => match action {
            None | Some(SavingsAction::List) => commands::cmd_savings_list(&mut ctx).await,
            Some(SavingsAction::Add {
                name,
                amount,
                location,
                date,
                yield_rate,
                status,
            }) => {
                let draft = commands::savings_draft(
                    &name,
                    &amount,
                    &location,
                    date.as_deref(),
                    &yield_rate,
                    &status,
                )?;
                commands::cmd_savings_add(&mut ctx, &draft).await
            }
            Some(SavingsAction::Edit {
                id,
                name,
                amount,
                location,
                date,
                yield_rate,
                status,
            }) => {
                let changes = SavingsChanges {
                    name,
                    amount,
                    location,
                    date,
                    yield_rate,
                    status,
                };
                commands::cmd_savings_edit(&mut ctx, &id, &changes).await
            }
            Some(SavingsAction::Delete { id }) => {
                commands::cmd_savings_delete(&mut ctx, &id).await
            }
            Some(SavingsAction::Insights { id }) => {
                commands::cmd_savings_insights(&mut ctx, id.as_deref()).await
            }
        },
        Commands::Summary { json } => commands::cmd_summary(&mut ctx, json).await,
        Commands::Insights { json } => commands::cmd_insights(&mut ctx, json).await,
        Commands::Sync => commands::cmd_sync(&mut ctx).await,
    }
}
