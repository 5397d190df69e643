//! Shared command context and input parsing
//!
//! This module contains:
//! - `AppContext` - configuration, API client, local store and session
//! - `load_book` - refresh a record list, reporting failures as notices
//! - Parsers for amounts, dates and enum labels typed on the command line

use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use nestegg_core::gateway::{ApiClient, LocalStore, RecordBook, Session, SessionStore};
use nestegg_core::models::{parse_iso_date, Record, SavingsStatus, TransactionType};
use nestegg_core::{money, Config, Error};

/// Everything a command needs
pub struct AppContext {
    pub config: Config,
    pub client: ApiClient,
    pub local: LocalStore,
    pub sessions: SessionStore,
    pub session: Session,
}

impl AppContext {
    /// Load config (file, environment) and apply the command-line overrides
    pub fn open(api_url: Option<&str>, data_dir: Option<&Path>) -> Result<Self> {
        let mut config = Config::load().context("Failed to load configuration")?;
        if let Some(url) = api_url {
            config.set_api_url(url)?;
        }
        if let Some(dir) = data_dir {
            config.set_data_dir(dir);
        }
        Self::new(config)
    }

    pub fn new(config: Config) -> Result<Self> {
        let sessions = SessionStore::new(&config.data_dir);
        let session = match sessions.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session file");
                Session::anonymous()
            }
        };
        tracing::debug!(
            api_url = %config.api_url,
            data_dir = %config.data_dir.display(),
            logged_in = session.is_authenticated(),
            "Context ready"
        );

        Ok(Self {
            client: ApiClient::from_config(&config),
            local: LocalStore::new(&config.data_dir),
            sessions,
            session,
            config,
        })
    }

    pub fn book<R: Record>(&self) -> RecordBook<R> {
        RecordBook::new(self.client.clone(), self.local.clone())
    }

    pub fn save_session(&self) -> Result<()> {
        self.sessions
            .save(&self.session)
            .context("Failed to save session")
    }

    /// Print the user-facing notice for a gateway error.
    ///
    /// Auth errors have already cleared the in-memory session; the cleared
    /// session is persisted here.
    pub fn report(&self, err: &Error) -> Result<()> {
        tracing::debug!(error = %err, "Gateway error");
        eprintln!("⚠️  {}", err.notice());
        if err.is_auth() {
            self.save_session()?;
            eprintln!("   Run 'nestegg login' to sign in again.");
        }
        Ok(())
    }

    pub fn print_mode(&self) {
        if !self.session.is_authenticated() {
            println!("   💾 Not logged in: records are kept on this device only");
        }
    }
}

/// Refresh a record list; failures are printed, not returned
pub async fn load_book<R: Record>(ctx: &mut AppContext) -> Result<RecordBook<R>> {
    let mut book = ctx.book::<R>();
    if let Err(e) = book.refresh(&mut ctx.session).await {
        ctx.report(&e)?;
        if matches!(e, Error::Network(_)) && !book.is_empty() {
            println!("   📴 Showing the last synced copy");
        }
    }
    Ok(book)
}

pub fn parse_amount(s: &str) -> Result<Decimal> {
    let value = money::parse_decimal(s).ok_or_else(|| anyhow!("Invalid amount: '{}'", s))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(anyhow!("Amount must not be negative: '{}'", s));
    }
    Ok(value)
}

/// Yield rates may be negative (a losing fund)
pub fn parse_rate(s: &str) -> Result<Decimal> {
    money::parse_decimal(s).ok_or_else(|| anyhow!("Invalid yield rate: '{}'", s))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_iso_date(s).ok_or_else(|| anyhow!("Invalid date: '{}' (expected YYYY-MM-DD)", s))
}

/// Today's date, or the parsed `--date` value
pub fn date_or_today(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn parse_kind(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s).map_err(|e| anyhow!(e))
}

pub fn parse_status(s: &str) -> Result<SavingsStatus> {
    SavingsStatus::from_str(s).map_err(|e| anyhow!(e))
}

/// Amount with thousands separators and the shekel sign
pub fn shekels(value: Decimal) -> String {
    format!("{} ₪", money::format_amount(value))
}
