/// CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

use crate::api::ExpenseApi;
use crate::color::resolve_color;
use crate::config::Config;
use crate::export;
use crate::icons::{self, filter_available_icons};
use crate::month::YearMonth;
use crate::types::{
    AccountId, AccountPayload, CategoryId, CategoryPayload, TagId, TagPayload, TransactionKind,
    TransactionPayload,
};
use crate::ui::format_amount;

#[derive(Parser, Debug)]
#[command(
    name = "spendr",
    version,
    about = "Spendr - A terminal front-end for your expense tracker"
)]
pub struct Cli {
    /// Use the local SQLite database instead of the server.
    #[arg(long, global = true)]
    pub local: bool,

    /// Server base URL, overriding config and environment.
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Open the TUI with the add-category form pre-filled.
    #[arg(long, value_name = "NAME")]
    pub new_category: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the monthly summary.
    Dashboard {
        #[arg(short, long, value_name = "YYYY-MM")]
        month: Option<YearMonth>,
    },
    /// Save the top categories chart as PNG.
    Export {
        #[arg(short, long, value_name = "YYYY-MM")]
        month: Option<YearMonth>,
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
        #[arg(long)]
        scale: Option<u32>,
    },
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    Txn {
        #[command(subcommand)]
        command: TxnCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        icon: Option<String>,
        #[arg(long)]
        income: bool,
    },
    Edit {
        id: CategoryId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_icon")]
        icon: Option<String>,
        #[arg(long)]
        clear_icon: bool,
    },
    Delete {
        id: CategoryId,
    },
    /// List icons not yet taken by another category.
    Icons {
        /// Keep this category's own icon in the list.
        #[arg(long, value_name = "ID")]
        editing: Option<CategoryId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    List,
    Add { name: String },
    Delete { id: TagId },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    List,
    Add {
        name: String,
        #[arg(short = 't', long = "type")]
        kind: String,
        #[arg(short, long)]
        provider: String,
        #[arg(short, long)]
        number: Option<String>,
    },
    Delete {
        id: AccountId,
    },
}

#[derive(Subcommand, Debug)]
pub enum TxnCommand {
    Add {
        description: String,
        amount: f64,
        #[arg(short, long)]
        account: AccountId,
        #[arg(short, long)]
        category: Option<CategoryId>,
        #[arg(short, long, default_value = "debit", value_parser = parse_kind)]
        kind: TransactionKind,
        /// `YYYY-MM-DD`, defaults to now.
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,
    },
}

/// Execute a non-interactive command against the configured backend.
pub fn run(command: Command, api: &dyn ExpenseApi, config: &Config) -> Result<()> {
    let symbol = config.currency_symbol.as_str();
    match command {
        Command::Dashboard { month } => {
            handle_dashboard(month.unwrap_or_else(YearMonth::current), api, symbol)?
        }
        Command::Export { month, out, scale } => handle_export(
            month.unwrap_or_else(YearMonth::current),
            out.unwrap_or_else(|| config.export_dir()),
            scale.unwrap_or(config.export_scale),
            api,
        )?,
        Command::Category { command } => handle_category(command, api)?,
        Command::Tag { command } => handle_tag(command, api)?,
        Command::Account { command } => handle_account(command, api)?,
        Command::Txn {
            command:
                TxnCommand::Add {
                    description,
                    amount,
                    account,
                    category,
                    kind,
                    date,
                },
        } => {
            let payload = TransactionPayload {
                txn_date: date.unwrap_or_else(|| Local::now().naive_local()),
                description,
                amount,
                kind,
                source: "manual".to_string(),
                account_id: account,
                category_id: category,
            };
            let txn = api.create_transaction(&payload)?;
            println!(
                "Recorded {} {} '{}' (id {}).",
                txn.kind.as_str(),
                format_amount(txn.amount, symbol),
                txn.description,
                txn.id
            );
        }
    }
    Ok(())
}

fn handle_dashboard(month: YearMonth, api: &dyn ExpenseApi, symbol: &str) -> Result<()> {
    let data = api.dashboard(month)?;
    println!("{}", month.label());
    println!("  Total spent:     {}", format_amount(data.total_spent, symbol));
    println!(
        "  Daily average:   {}",
        format_amount(data.daily_average_spend, symbol)
    );
    println!(
        "  Projected spend: {}",
        format_amount(data.projected_monthly_spend, symbol)
    );
    match data.percent_change_from_last_month {
        Some(change) => println!("  vs last month:   {change:+.1}%"),
        None => println!("  vs last month:   n/a"),
    }

    if !data.top_spending_categories.is_empty() {
        println!("Top categories:");
        for entry in &data.top_spending_categories {
            println!(
                "  {:<20} {}",
                entry.category,
                format_amount(entry.amount, symbol)
            );
        }
    }
    println!(
        "{} recent transaction(s)",
        data.recent_transactions.len()
    );
    Ok(())
}

fn handle_export(month: YearMonth, out: PathBuf, scale: u32, api: &dyn ExpenseApi) -> Result<()> {
    let data = api.dashboard(month)?;
    let path = export::export_chart(&data.top_spending_categories, month, &out, scale)?;
    println!("Chart saved to {}", path.display());
    Ok(())
}

fn handle_category(command: CategoryCommand, api: &dyn ExpenseApi) -> Result<()> {
    match command {
        CategoryCommand::List => {
            for category in api.categories()? {
                let glyph = category
                    .icon_name
                    .as_deref()
                    .map(icons::glyph)
                    .unwrap_or(" ");
                let income = if category.is_income { "  (income)" } else { "" };
                let color = resolve_color(&category.name, category.id);
                println!(
                    "{:>4}  {glyph} {:<24} {}{income}",
                    category.id,
                    category.name,
                    color.css()
                );
            }
        }
        CategoryCommand::Add { name, icon, income } => {
            let categories = api.categories()?;
            if let Some(icon) = icon.as_deref() {
                ensure_icon_available(icon, &filter_available_icons(&icons::catalog(), &categories, None))?;
            }
            let created = api.create_category(&CategoryPayload {
                name: name.trim().to_string(),
                icon_name: icon,
                is_income: income,
            })?;
            println!("Category '{}' created (id {}).", created.name, created.id);
        }
        CategoryCommand::Edit {
            id,
            name,
            icon,
            clear_icon,
        } => {
            let categories = api.categories()?;
            let Some(existing) = categories.iter().find(|category| category.id == id) else {
                bail!("Category {id} not found.");
            };
            if let Some(icon) = icon.as_deref() {
                let available = filter_available_icons(&icons::catalog(), &categories, Some(existing));
                ensure_icon_available(icon, &available)?;
            }
            let icon_name = if clear_icon {
                None
            } else {
                icon.or_else(|| existing.icon_name.clone())
            };
            let updated = api.update_category(
                id,
                &CategoryPayload {
                    name: name
                        .map(|name| name.trim().to_string())
                        .unwrap_or_else(|| existing.name.clone()),
                    icon_name,
                    is_income: existing.is_income,
                },
            )?;
            println!("Category '{}' updated.", updated.name);
        }
        CategoryCommand::Delete { id } => {
            api.delete_category(id)?;
            println!("Category deleted!");
        }
        CategoryCommand::Icons { editing } => {
            let categories = api.categories()?;
            let editing = match editing {
                Some(id) => match categories.iter().find(|category| category.id == id) {
                    Some(category) => Some(category),
                    None => bail!("Category {id} not found."),
                },
                None => None,
            };
            for icon in filter_available_icons(&icons::catalog(), &categories, editing) {
                println!("{}  {icon}", icons::glyph(icon));
            }
        }
    }
    Ok(())
}

fn ensure_icon_available(icon: &str, available: &[&str]) -> Result<()> {
    if !icons::catalog().contains(&icon) {
        bail!("Unknown icon '{icon}'. Run `spendr category icons` for the list.");
    }
    if !available.contains(&icon) {
        bail!("Icon '{icon}' is already used by another category.");
    }
    Ok(())
}

fn handle_tag(command: TagCommand, api: &dyn ExpenseApi) -> Result<()> {
    match command {
        TagCommand::List => {
            for tag in api.tags()? {
                println!("{:>4}  {}", tag.id, tag.name);
            }
        }
        TagCommand::Add { name } => {
            let created = api.create_tag(&TagPayload {
                name: name.trim().to_string(),
            })?;
            println!("Tag '{}' created (id {}).", created.name, created.id);
        }
        TagCommand::Delete { id } => {
            api.delete_tag(id)?;
            println!("Tag deleted!");
        }
    }
    Ok(())
}

fn handle_account(command: AccountCommand, api: &dyn ExpenseApi) -> Result<()> {
    match command {
        AccountCommand::List => {
            for account in api.accounts()? {
                println!(
                    "{:>4}  {} ({}, {}){}",
                    account.id,
                    account.name,
                    account.kind,
                    account.provider,
                    account
                        .account_number
                        .map(|number| format!(" {number}"))
                        .unwrap_or_default()
                );
            }
        }
        AccountCommand::Add {
            name,
            kind,
            provider,
            number,
        } => {
            let created = api.create_account(&AccountPayload {
                name: name.trim().to_string(),
                kind: kind.trim().to_string(),
                provider: provider.trim().to_string(),
                account_number: number
                    .map(|number| number.trim().to_string())
                    .filter(|number| !number.is_empty()),
            })?;
            println!("Account '{}' created (id {}).", created.name, created.id);
        }
        AccountCommand::Delete { id } => {
            api.delete_account(id)?;
            println!("Account deleted!");
        }
    }
    Ok(())
}

fn parse_kind(value: &str) -> Result<TransactionKind, String> {
    TransactionKind::parse(value).ok_or_else(|| format!("expected debit or credit, got '{value}'"))
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}
