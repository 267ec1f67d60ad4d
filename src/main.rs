//! settle-up CLI
//!
//! # Usage
//!
//! ```bash
//! # Simplify a debt list from a JSON file
//! settle-up simplify --input debts.json
//!
//! # Output as JSON
//! settle-up simplify --input debts.json --format json
//!
//! # Keep groups in a store file
//! settle-up group create "Ski trip" --by alice
//! settle-up group add-member <GROUP> alice
//! settle-up group add-debt <GROUP> bob alice 40
//! settle-up group simplify <GROUP>
//! ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Command, Format, GroupCommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settle_up::core::balance::Balances;
use settle_up::core::debt::Debt;
use settle_up::core::group::Group;
use settle_up::core::money::format_amount;
use settle_up::core::person::PersonId;
use settle_up::optimization::settlement::SettlementPlan;
use settle_up::optimization::simplify::{DebtSimplifier, SimplificationResult};
use settle_up::simulation::generator::{generate_random_debts, NetworkConfig};
use settle_up::storage::group_store::GroupStore;
use std::fs;
use std::path::Path;

/// JSON schema for debt files read by `simplify` and `balances`.
#[derive(Serialize, Deserialize)]
struct DebtsFile {
    debts: Vec<Debt>,
}

/// JSON output schema for simplification results.
#[derive(Serialize)]
struct SimplifyOutput<'a> {
    transfers: &'a [Debt],
    original_count: usize,
    transfer_count: usize,
    gross_total: String,
    net_total: String,
    savings: String,
    savings_percent: f64,
    valid: bool,
}

impl<'a> SimplifyOutput<'a> {
    fn new(result: &'a SimplificationResult) -> Self {
        Self {
            transfers: result.transfers(),
            original_count: result.original_count(),
            transfer_count: result.transfer_count(),
            gross_total: result.gross_total().to_string(),
            net_total: result.net_total().to_string(),
            savings: result.savings().to_string(),
            savings_percent: result.savings_percent(),
            valid: result.is_valid(),
        }
    }
}

#[derive(Serialize)]
struct BalanceOutput {
    person: String,
    balance: String,
    status: &'static str,
}

fn status(amount: Decimal) -> &'static str {
    if amount > Decimal::ZERO {
        "CREDITOR"
    } else if amount < Decimal::ZERO {
        "DEBTOR"
    } else {
        "SETTLED"
    }
}

fn load_debts(path: &Path) -> Result<Vec<Debt>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read debts file: {}", path.display()))?;
    let file: DebtsFile = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse {} (expected {{\"debts\": [{{\"from\", \"to\", \"amount\"}}]}})",
            path.display()
        )
    })?;
    log::info!("Loaded {} debts from {}", file.debts.len(), path.display());
    Ok(file.debts)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn print_balances(balances: &Balances, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let rows: Vec<BalanceOutput> = balances
                .iter()
                .map(|(person, amount)| BalanceOutput {
                    person: person.to_string(),
                    balance: amount.to_string(),
                    status: status(amount),
                })
                .collect();
            print_json(&rows)
        }
        Format::Text => {
            println!("=== Balances ===");
            for (person, amount) in balances.iter() {
                println!(
                    "  {:<15} {:>12}  [{}]",
                    person.as_str(),
                    format_amount(amount),
                    status(amount)
                );
            }
            println!("\nOutstanding:    {}", format_amount(balances.total_outstanding()));
            Ok(())
        }
    }
}

fn print_simplification(result: &SimplificationResult, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&SimplifyOutput::new(result)),
        Format::Text => {
            println!("{}", result);
            println!("{}", SettlementPlan::from_transfers(result.transfers()));
            Ok(())
        }
    }
}

fn print_group(group: &Group, format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(group);
    }
    println!("{} ({})", group.name(), group.id());
    let members: Vec<&str> = group.members().iter().map(PersonId::as_str).collect();
    println!("  Members:  {}", members.join(", "));
    println!("  Debts:");
    for (i, debt) in group.debts().iter().enumerate() {
        println!(
            "    [{}] {} owes {} {}",
            i,
            debt.from(),
            debt.to(),
            format_amount(debt.amount())
        );
    }
    if !group.requests().is_empty() {
        println!("  Requests:");
        for r in group.requests() {
            println!(
                "    {} {} asks {} for {} [{}]{}",
                r.id(),
                r.from(),
                r.to(),
                format_amount(r.amount()),
                r.status(),
                r.description().map(|d| format!(" {}", d)).unwrap_or_default()
            );
        }
    }
    println!();
    print_balances(&group.balances(), Format::Text)
}

fn run_group(store_path: &Path, format: Format, action: GroupCommand) -> Result<()> {
    let store = GroupStore::load(store_path)
        .with_context(|| format!("Failed to load store: {}", store_path.display()))?;

    let mutated = match action {
        GroupCommand::Create { name, created_by } => {
            let id = store.create_group(&name, &created_by)?;
            println!("{}", id);
            true
        }
        GroupCommand::List => {
            let groups = store.list()?;
            if format == Format::Json {
                print_json(&groups)?;
            } else if groups.is_empty() {
                println!("No groups.");
            } else {
                for g in &groups {
                    println!(
                        "{}  {:<20} {} members, {} debts",
                        g.id(),
                        g.name(),
                        g.members().len(),
                        g.debts().len()
                    );
                }
            }
            false
        }
        GroupCommand::Show { group } => {
            print_group(&store.get(group)?, format)?;
            false
        }
        GroupCommand::Delete { group } => {
            let removed = store.delete_group(group)?;
            println!("Deleted {}", removed.name());
            true
        }
        GroupCommand::AddMember { group, name } => {
            let person = store.update(group, |g| g.add_member(&name))?;
            println!("Added {}", person);
            true
        }
        GroupCommand::AddDebt {
            group,
            from,
            to,
            amount,
        } => {
            let debt = store.update(group, |g| {
                g.add_debt(&PersonId::new(from.trim()), &PersonId::new(to.trim()), amount)
                    .cloned()
            })?;
            println!("Recorded {}", debt);
            true
        }
        GroupCommand::RemoveDebt { group, index } => {
            let debt = store.update(group, |g| g.remove_debt(index))?;
            println!("Removed {}", debt);
            true
        }
        GroupCommand::Request {
            group,
            from,
            to,
            amount,
            description,
        } => {
            let id = store.update(group, |g| {
                g.request_money(
                    &PersonId::new(from.trim()),
                    &PersonId::new(to.trim()),
                    amount,
                    description,
                )
            })?;
            println!("{}", id);
            true
        }
        GroupCommand::Approve { group, request } => {
            let debt = store.update(group, |g| g.approve_request(request).cloned())?;
            println!("Approved, recorded {}", debt);
            true
        }
        GroupCommand::Reject { group, request } => {
            store.update(group, |g| g.reject_request(request))?;
            println!("Rejected {}", request);
            true
        }
        GroupCommand::Simplify { group } => {
            let result = store.simplify(group)?;
            print_simplification(&result, format)?;
            true
        }
    };

    if mutated {
        store
            .save(store_path)
            .with_context(|| format!("Failed to save store: {}", store_path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match args.command {
        Command::Simplify { input, format } => {
            let debts = load_debts(&input)?;
            let result = DebtSimplifier::run(&debts);
            print_simplification(&result, format)
        }
        Command::Balances { input, format } => {
            let debts = load_debts(&input)?;
            print_balances(&Balances::from_debts(&debts), format)
        }
        Command::Generate {
            people,
            debts,
            min_amount,
            max_amount,
            output,
        } => {
            let config = NetworkConfig {
                people,
                debts,
                min_amount,
                max_amount,
            };
            let file = DebtsFile {
                debts: generate_random_debts(&config).context("Invalid generator settings")?,
            };
            let json = serde_json::to_string_pretty(&file).context("Failed to serialize debts")?;
            match output {
                Some(path) => {
                    fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!(
                        "Generated {} debts across {} people -> {}",
                        file.debts.len(),
                        people,
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Command::Group {
            store,
            format,
            action,
        } => run_group(&store, format, action),
    }
}
