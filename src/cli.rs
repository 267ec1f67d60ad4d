use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use settle_up::core::group::GroupId;
use settle_up::core::money::parse_amount;
use settle_up::core::request::RequestId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "settle-up",
    author,
    version,
    about = "Group expense ledger with debt simplification",
    long_about = None,
    after_help = "INPUT FORMAT (simplify, balances):\n    {\"debts\": [{\"from\": \"alice\", \"to\": \"bob\", \"amount\": \"12.50\"}]}\n\nLog verbosity is controlled with RUST_LOG (default: warn)."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simplify a list of debts read from a JSON file
    Simplify {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Show each person's net balance for a list of debts
    Balances {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Generate a random debt list (for testing)
    Generate {
        #[arg(long, default_value_t = 10)]
        people: usize,
        #[arg(long, default_value_t = 30)]
        debts: usize,
        #[arg(long, default_value = "1", value_parser = parse_amount)]
        min_amount: Decimal,
        #[arg(long, default_value = "500", value_parser = parse_amount)]
        max_amount: Decimal,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Manage groups kept in a store file
    Group {
        /// Store file holding all groups
        #[arg(long, value_name = "FILE", default_value = "settle-up.json", global = true)]
        store: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
        format: Format,
        #[command(subcommand)]
        action: GroupCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a new group
    Create {
        name: String,
        /// Who is creating the group
        #[arg(long = "by", default_value = "")]
        created_by: String,
    },
    /// List all groups
    List,
    /// Show a group's members, debts and requests
    Show { group: GroupId },
    /// Delete a group
    Delete { group: GroupId },
    /// Add a member to a group
    AddMember { group: GroupId, name: String },
    /// Record that FROM owes TO an amount
    AddDebt {
        group: GroupId,
        from: String,
        to: String,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },
    /// Remove the debt at INDEX (as listed by `show`)
    RemoveDebt { group: GroupId, index: usize },
    /// FROM asks TO for money
    Request {
        group: GroupId,
        from: String,
        to: String,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Approve a pending money request
    Approve { group: GroupId, request: RequestId },
    /// Reject a pending money request
    Reject { group: GroupId, request: RequestId },
    /// Replace a group's debts with the simplified transfers
    Simplify { group: GroupId },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}
