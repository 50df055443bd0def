use std::io::stdout;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};

use crate::config::Config;
use crate::csv_utils::write_orders;
use crate::dates::{normalize, parse_date};
use crate::report::DayReport;
use crate::store::{validate_field, validate_new_order, OrderStore};
use crate::types::{Error, Field, NewOrder, OrderId, Status};

mod config;
mod csv_utils;
mod dates;
mod quantity;
mod report;
mod store;
mod types;

/// Caruru and bobó orders kept in a CSV file.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Order book to read and write [env: CARURU_ORDERS_FILE, default: pedidos.csv]
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals for one day, split into pending and delivered (the default)
    Report {
        /// Day to report on [env: CARURU_REPORT_DATE, default: 2025-12-24]
        #[arg(long)]
        date: Option<String>,
    },
    /// Print orders as CSV
    List {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Register a new order
    Add {
        #[arg(long)]
        client: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        status: Option<String>,
        /// Kilograms of caruru
        #[arg(long, default_value = "0")]
        caruru: String,
        /// Kilograms of bobó
        #[arg(long, default_value = "0")]
        bobo: String,
        /// Price in reais
        #[arg(long, default_value = "0")]
        value: String,
    },
    /// Change one field of an order
    Update {
        id: OrderId,
        /// Column name, e.g. Cliente, Data, Status, Caruru, Bobó, Valor
        field: String,
        value: String,
    },
    /// Change the status of an order
    SetStatus { id: OrderId, status: String },
    /// Remove an order
    Delete { id: OrderId },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = Config::from_env();
    let path = cli.file.unwrap_or_else(|| config.orders_file.clone());
    let mut store = OrderStore::load(&path)?;

    match cli.command.unwrap_or(Command::Report { date: None }) {
        Command::Report { date } => {
            let date = match date {
                Some(d) => parse_date(&d).ok_or(Error::InvalidDate(d))?,
                None => config.report_date()?,
            };
            print!("{}", DayReport::build(store.list(), date));
        }

        Command::List { date, status } => {
            let date = date
                .map(|d| parse_date(&d).ok_or(Error::InvalidDate(d)))
                .transpose()?;
            let status = status
                .map(|s| Status::recognize(&s).ok_or(Error::UnknownStatus(s)))
                .transpose()?;

            let selected = store.list().iter().filter(|o| {
                date.map_or(true, |d| normalize(&o.date).valid() == Some(d))
                    && status.map_or(true, |s| Status::from_label(&o.status) == s)
            });
            write_orders(stdout(), selected)?;
        }

        Command::Add {
            client,
            contact,
            date,
            status,
            caruru,
            bobo,
            value,
        } => {
            let status = match status {
                Some(s) => validate_field(Field::Status, &s)?,
                None => Status::Pending.label().to_string(),
            };
            let order = validate_new_order(NewOrder {
                client,
                contact,
                date,
                status,
                caruru_kg: caruru,
                bobo_kg: bobo,
                value,
            })?;
            let id = store.create(order)?;
            store.save(&path)?;
            println!("{}", id);
        }

        Command::Update { id, field, value } => {
            let field: Field = field.parse()?;
            let value = validate_field(field, &value)?;
            store.update(id, field, &value)?;
            store.save(&path)?;
            write_orders(stdout(), store.get(id))?;
        }

        Command::SetStatus { id, status } => {
            let status = Status::recognize(&status).ok_or(Error::UnknownStatus(status))?;
            store.set_status(id, status)?;
            store.save(&path)?;
            info!("Order {} is now {}", id, status);
        }

        Command::Delete { id } => {
            let removed = store.delete(id)?;
            store.save(&path)?;
            info!("Removed order {} for {}", removed.id, removed.client);
        }
    }

    Ok(())
}
