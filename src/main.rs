// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use table_organizer::{
    print_price, validate_person_name, Backend, BillSummary, ConsumableForm, ConsumableId,
    MemoryStore, Settings, SqliteStore, TableError, TableManager, TableStore,
};

#[derive(Parser, Debug)]
#[command(name = "table-organizer")]
#[command(about = "Split the bill of a shared table", version)]
struct Cli {
    /// Settings file (defaults to ./table-organizer.toml when present)
    #[arg(long)]
    config: Option<String>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// SQLite database file
    #[arg(long, env = "TABLE_ORGANIZER_DB")]
    db: Option<PathBuf>,

    /// Tip percentage
    #[arg(long, allow_negative_numbers = true)]
    tip: Option<i64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    AddPerson { name: String },
    RemovePerson { name: String },
    /// Add an item; price as a decimal amount, e.g. 12.50
    AddItem {
        name: String,
        price: String,
        #[arg(default_value = "1")]
        quantity: String,
    },
    RemoveItem { id: ConsumableId },
    /// Mark item ID as shared by NAME
    Link { id: ConsumableId, name: String },
    Unlink { id: ConsumableId, name: String },
    /// Print items and persons
    List,
    Summary {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Remove every person and item
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::new(cli.config.as_deref()).context("Failed to load settings")?;
    if cli.memory {
        settings.storage.backend = Backend::Memory;
    }
    if let Some(db) = &cli.db {
        settings.storage.backend = Backend::Sqlite;
        settings.storage.path = db.clone();
    }
    if let Some(tip) = cli.tip {
        settings.tip = tip;
    }

    let command = cli.command.unwrap_or(Command::Tui);
    init_logging(&settings, matches!(command, Command::Tui))?;

    match settings.storage.backend {
        Backend::Memory => {
            let mut table = TableManager::open(MemoryStore::new(), settings.tip)?;
            run(&mut table, command)
        }
        Backend::Sqlite => {
            let store = SqliteStore::open(&settings.storage.path).with_context(|| {
                format!("Failed to open database {}", settings.storage.path.display())
            })?;
            let mut table = TableManager::open(store, settings.tip)?;
            run(&mut table, command)
        }
    }
}

/// Logs go to stderr, or to the log file while the terminal UI owns the screen
fn init_logging(settings: &Settings, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("table_organizer={}", settings.log_level)));

    if tui {
        let file = File::create(&settings.log_file)
            .with_context(|| format!("Failed to create log file {}", settings.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}

fn run<S: TableStore>(table: &mut TableManager<S>, command: Command) -> Result<()> {
    match command {
        Command::Tui => run_ui_mode(table)?,
        Command::AddPerson { name } => {
            let name = match validate_person_name(&name) {
                Ok(name) => name,
                Err(errors) => bail!("{}", errors[0]),
            };
            match table.add_person(&name) {
                Ok(person) => println!("✓ Added {}", person.name),
                Err(TableError::DuplicatePerson(name)) => bail!("{} is already at the table", name),
                Err(e) => return Err(e.into()),
            }
        }
        Command::RemovePerson { name } => {
            if table.remove_person(&name)? {
                println!("✓ Removed {}", name);
            } else {
                bail!("Nobody named {} at the table", name);
            }
        }
        Command::AddItem { name, price, quantity } => {
            let item = match ConsumableForm::new(&name, &quantity, &price).validate() {
                Ok(item) => item,
                Err(errors) => {
                    for error in &errors {
                        eprintln!("❌ {}", error);
                    }
                    bail!("Item not added");
                }
            };
            let consumable = table.add_consumable(&item.name, item.price, item.quantity)?;
            println!(
                "✓ Added #{} {} ({} x {})",
                consumable.id,
                consumable.name,
                consumable.quantity,
                print_price(consumable.price)
            );
        }
        Command::RemoveItem { id } => {
            if table.remove_consumable(id)? {
                println!("✓ Removed item #{}", id);
            } else {
                bail!("No item #{}", id);
            }
        }
        Command::Link { id, name } => {
            if !table.add_consumable_to_person(id, &name)? {
                bail!("Unknown item #{} or person {}", id, name);
            }
            println!("✓ {} shares item #{}", name, id);
        }
        Command::Unlink { id, name } => {
            if table.remove_consumable_from_person(id, &name)? {
                println!("✓ {} no longer shares item #{}", name, id);
            } else {
                println!("{} was not sharing item #{}", name, id);
            }
        }
        Command::List => {
            println!("Items:");
            for c in table.consumables() {
                let consumers: Vec<&str> = c.consumers().collect();
                println!(
                    "  #{:<4} {:<24} {:>3} x {:>10}  [{}]",
                    c.id,
                    c.name,
                    c.quantity,
                    print_price(c.price),
                    consumers.join(", ")
                );
            }
            println!("Persons:");
            for p in table.persons() {
                println!("  {:<24} {:>10}", p.name, print_price(table.personal_bill(p)));
            }
        }
        Command::Summary { format } => {
            let summary = BillSummary::from_table(table);
            match format {
                Format::Text => print!("{}", summary.render_text()),
                Format::Json => println!("{}", summary.to_json()?),
                Format::Csv => summary.write_csv(io::stdout())?,
            }
        }
        Command::Clear => {
            table.clear()?;
            println!("✓ Table cleared");
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode<S: TableStore>(table: &mut TableManager<S>) -> Result<()> {
    ui::run_ui(table)?;
    println!("\n✅ Bill: {}", print_price(table.total_bill_with_tip()));
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode<S: TableStore>(_table: &mut TableManager<S>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand, e.g.: table-organizer summary");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_comes_from_package() {
        let version = Cli::command().render_version();
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_memory_conflicts_with_db() {
        let result = Cli::try_parse_from(["table-organizer", "--memory", "--db", "t.db", "list"]);
        assert!(result.is_err());
    }
}
