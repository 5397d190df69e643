//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nestegg - Track transactions and savings, get advice
#[derive(Parser)]
#[command(name = "nestegg")]
#[command(about = "Personal finance client for transactions and savings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Finance API base URL (overrides config file and NESTEGG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for the session, local drafts and the offline mirror
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to the finance API
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Update first and last name
    Profile {
        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Manage transactions (list, add, edit, delete)
    Tx {
        #[command(subcommand)]
        action: Option<TxAction>,
    },

    /// Manage savings instruments (list, add, edit, delete, insights)
    Savings {
        #[command(subcommand)]
        action: Option<SavingsAction>,
    },

    /// Show totals, balance and expenses by category
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show progress and recommendations for the whole portfolio
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload records saved on this device while logged out
    Sync,
}

#[derive(Subcommand)]
pub enum TxAction {
    /// List transactions
    List {
        /// Case-insensitive text to find in the description
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Exact date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Add a transaction
    Add {
        #[arg(long)]
        description: String,

        #[arg(short, long)]
        amount: String,

        /// income or expense (הכנסה / הוצאה also accepted)
        #[arg(short = 't', long = "type")]
        kind: String,

        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction ID
        id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SavingsAction {
    /// List savings instruments
    List,

    /// Add a savings instrument
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        amount: String,

        /// bank, pension, education-fund, provident-fund, savings, portfolio (or the Hebrew label)
        #[arg(short, long)]
        location: String,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Annual yield in percent
        #[arg(short, long = "yield", default_value = "0")]
        yield_rate: String,

        /// active or inactive
        #[arg(short, long, default_value = "active")]
        status: String,
    },

    /// Change fields of a savings instrument
    Edit {
        /// Savings instrument ID
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long = "yield")]
        yield_rate: Option<String>,

        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete a savings instrument
    Delete {
        /// Savings instrument ID
        id: String,
    },

    /// Show advice for one instrument, or all of them
    Insights {
        /// Savings instrument ID
        id: Option<String>,
    },
}
