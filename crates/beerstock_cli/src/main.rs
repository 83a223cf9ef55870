//! Operator CLI over a beer stock database file.
//!
//! # Responsibility
//! - Run one stock operation per invocation against a local database.
//! - Print results as plain lines; exit non-zero on any failure.

use beerstock_core::db::open_db;
use beerstock_core::model::input::quantity_delta;
use beerstock_core::{
    core_version, init_logging, Beer, BeerCategory, BeerDraft, BeerId, SqliteBeerRepository,
    StockService,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "beerstock.sqlite3";

const USAGE: &str = "usage: beerstock [--db <path>] <command>

commands:
  list
  show <name>
  add <name> <brand> <max> <quantity> <type>
  increment <id> <amount>
  decrement <id> <amount>
  delete <id>
  version";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Show(String),
    Add(Beer),
    Increment(BeerId, u32),
    Decrement(BeerId, u32),
    Delete(BeerId),
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    db_path: String,
    command: Command,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if let Ok(log_dir) = std::env::var("BEERSTOCK_LOG_DIR") {
        let level = std::env::var("BEERSTOCK_LOG_LEVEL")
            .unwrap_or_else(|_| beerstock_core::default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(invocation) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> Result<Vec<String>, Box<dyn Error>> {
    if invocation.command == Command::Version {
        return Ok(vec![format!("beerstock_core version={}", core_version())]);
    }

    let conn = open_db(&invocation.db_path)?;
    let service = StockService::new(SqliteBeerRepository::new(&conn));
    info!(
        "event=cli_command module=cli status=start command={:?}",
        invocation.command
    );

    let lines = match invocation.command {
        Command::List => service.list_all()?.iter().map(format_beer).collect(),
        Command::Show(name) => vec![format_beer(&service.find_by_name(&name)?)],
        Command::Add(beer) => vec![format_beer(&service.create(&beer)?)],
        Command::Increment(id, amount) => vec![format_beer(&service.increment(id, amount)?)],
        Command::Decrement(id, amount) => vec![format_beer(&service.decrement(id, amount)?)],
        Command::Delete(id) => {
            service.delete_by_id(id)?;
            vec![format!("deleted {id}")]
        }
        Command::Version => Vec::new(),
    };
    Ok(lines)
}

fn format_beer(beer: &Beer) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}/{}",
        beer.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
        beer.name,
        beer.brand,
        beer.category,
        beer.quantity,
        beer.capacity_max
    )
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut rest = args;
    let mut db_path =
        std::env::var("BEERSTOCK_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    if let [flag, path, tail @ ..] = rest {
        if flag == "--db" {
            db_path = path.clone();
            rest = tail;
        }
    }

    let command = match rest {
        [cmd] if cmd == "list" => Command::List,
        [cmd] if cmd == "version" => Command::Version,
        [cmd, name] if cmd == "show" => Command::Show(name.clone()),
        [cmd, name, brand, max, quantity, kind] if cmd == "add" => {
            let draft = BeerDraft {
                name: Some(name.clone()),
                brand: Some(brand.clone()),
                capacity_max: Some(parse_number("max", max)?),
                quantity: Some(parse_number("quantity", quantity)?),
                category: Some(
                    BeerCategory::parse(kind).ok_or_else(|| format!("unknown beer type `{kind}`"))?,
                ),
            };
            Command::Add(draft.into_beer().map_err(|err| err.to_string())?)
        }
        [cmd, id, amount] if cmd == "increment" => {
            Command::Increment(parse_number("id", id)?, parse_amount(amount)?)
        }
        [cmd, id, amount] if cmd == "decrement" => {
            Command::Decrement(parse_number("id", id)?, parse_amount(amount)?)
        }
        [cmd, id] if cmd == "delete" => Command::Delete(parse_number("id", id)?),
        [] => return Err("missing command".to_string()),
        [cmd, ..] => return Err(format!("unknown command or wrong arguments: `{cmd}`")),
    };

    Ok(Invocation { db_path, command })
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{field} must be a number, got `{value}`"))
}

fn parse_amount(value: &str) -> Result<u32, String> {
    quantity_delta(Some(parse_number("amount", value)?)).map_err(|err| err.to_string())
}
