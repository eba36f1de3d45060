use clap::Parser;
use daybook::args::{Args, Command, EventSubcommand, TransactionSubcommand};
use daybook::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home)?.print(),

        Command::Event(event_args) => {
            let config = Config::load(home)?;
            match event_args.action() {
                EventSubcommand::Add(args) => commands::event_add(config, args.clone())?.print(),
                EventSubcommand::List(args) => {
                    commands::event_list(config, args.clone())?.print()
                }
                EventSubcommand::Remove(args) => {
                    commands::event_remove(config, args.clone())?.print()
                }
            }
        }

        Command::Transaction(transaction_args) => {
            let config = Config::load(home)?;
            match transaction_args.action() {
                TransactionSubcommand::Add(args) => {
                    commands::transaction_add(config, args.clone())?.print()
                }
                TransactionSubcommand::Update(args) => {
                    commands::transaction_update(config, args.clone())?.print()
                }
                TransactionSubcommand::Delete(args) => {
                    commands::transaction_delete(config, args.clone())?.print()
                }
                TransactionSubcommand::List(args) => {
                    commands::transaction_list(config, args.clone())?.print()
                }
            }
        }

        Command::Summary => commands::summary(Config::load(home)?)?.print(),

        Command::Month(month_args) => {
            commands::month(Config::load(home)?, month_args.clone())?.print()
        }

        Command::Categories(categories_args) => {
            commands::categories(categories_args.clone())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
