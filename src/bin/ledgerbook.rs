use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use ledgerbook::{
    Amount, AppConfig, CategoryId, DEFAULT_TIMEZONE, TransactionId, User, format_currency,
    category::{
        CategoryName, create_category, delete_category, get_categories_for_user,
        get_category_by_name,
    },
    dashboard::{get_dashboard, render_dashboard},
    setup_logging,
    transaction::{
        Transaction, TransactionType, create_transaction, delete_transaction,
        get_categorized_transactions,
    },
    user::{create_user, get_user_by_username},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Track income and expenses and see where your money went this month.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database, created if it does not exist.
    #[arg(long)]
    db_path: PathBuf,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Log debug messages.
    #[arg(long, short)]
    verbose: bool,

    /// Also append log messages to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables.
    Init,

    /// Register a new user.
    AddUser {
        username: String,
    },

    /// Create a category for a user.
    AddCategory {
        #[arg(long)]
        user: String,

        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List a user's categories.
    Categories {
        #[arg(long)]
        user: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Delete a category and all of its transactions.
    DeleteCategory {
        #[arg(long)]
        user: String,

        id: CategoryId,
    },

    /// Record a transaction.
    Add {
        #[arg(long)]
        user: String,

        /// The name of an existing category.
        #[arg(long)]
        category: String,

        /// A positive amount with at most two decimal places, e.g. 12.50.
        #[arg(long)]
        amount: Amount,

        /// Either "income" or "expense".
        #[arg(long = "type")]
        transaction_type: TransactionType,

        /// The date of the transaction as YYYY-MM-DD, defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,

        #[arg(long, default_value = "")]
        note: String,
    },

    /// List a user's transactions, newest first.
    List {
        #[arg(long)]
        user: String,

        /// Show at most this many transactions.
        #[arg(long)]
        limit: Option<u32>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Delete a transaction.
    Delete {
        #[arg(long)]
        user: String,

        id: TransactionId,
    },

    /// Show this month's income, expenses and balance.
    Dashboard {
        #[arg(long)]
        user: String,

        /// Calculate the dashboard as of this date (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        as_of: Option<Date>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, DATE_FORMAT).map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("Could not open log file: {error}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(&args.db_path)?;
    let config = AppConfig::new(connection, &args.timezone)?;
    let connection = &config.db_connection;

    match args.command {
        Command::Init => {
            println!("Initialized database at {:#?}", args.db_path);
        }
        Command::AddUser { username } => {
            let user = create_user(&username, connection)?;
            println!("Created user \"{}\" with ID {}", user.username, user.id);
        }
        Command::AddCategory {
            user,
            name,
            description,
        } => {
            let user = find_user(&user, connection)?;
            let category =
                create_category(user.id, CategoryName::new(&name)?, &description, connection)?;
            println!("Created category \"{}\" with ID {}", category.name, category.id);
        }
        Command::Categories { user, json } => {
            let user = find_user(&user, connection)?;
            let categories = get_categories_for_user(user.id, connection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else if categories.is_empty() {
                println!("No categories yet.");
            } else {
                for category in categories {
                    println!("{:>6}  {}  {}", category.id, category.name, category.description);
                }
            }
        }
        Command::DeleteCategory { user, id } => {
            let user = find_user(&user, connection)?;
            delete_category(user.id, id, connection)?;
            println!("Deleted category {id}");
        }
        Command::Add {
            user,
            category,
            amount,
            transaction_type,
            date,
            note,
        } => {
            let user = find_user(&user, connection)?;
            let category =
                get_category_by_name(user.id, &CategoryName::new(&category)?, connection)?;
            let today = config.today()?;

            let transaction = create_transaction(
                user.id,
                Transaction::build(amount, transaction_type, date.unwrap_or(today), category.id)
                    .note(&note),
                today,
                connection,
            )?;

            println!(
                "Recorded {} of {} on {} with ID {}",
                transaction.transaction_type,
                format_currency(transaction.amount.as_decimal()),
                transaction.date,
                transaction.id
            );
        }
        Command::List { user, limit, json } => {
            let user = find_user(&user, connection)?;
            let transactions = get_categorized_transactions(user.id, limit, connection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            } else if transactions.is_empty() {
                println!("No transactions yet.");
            } else {
                for row in transactions {
                    let transaction = row.transaction;
                    println!(
                        "{:>6}  {}  {:<7}  {:>14}  {}  {}",
                        transaction.id,
                        transaction.date,
                        transaction.transaction_type,
                        format_currency(transaction.amount.as_decimal()),
                        row.category_name,
                        transaction.note
                    );
                }
            }
        }
        Command::Delete { user, id } => {
            let user = find_user(&user, connection)?;
            delete_transaction(user.id, id, connection)?;
            println!("Deleted transaction {id}");
        }
        Command::Dashboard { user, as_of, json } => {
            let user = find_user(&user, connection)?;
            let as_of = match as_of {
                Some(date) => date,
                None => config.today()?,
            };

            let dashboard = get_dashboard(user.id, as_of, connection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print!("{}", render_dashboard(&dashboard));
            }
        }
    }

    Ok(())
}

fn find_user(username: &str, connection: &Connection) -> Result<User, Box<dyn Error>> {
    get_user_by_username(username, connection).map_err(|error| match error {
        ledgerbook::Error::NotFound => format!("no user called \"{username}\"").into(),
        error => error.into(),
    })
}
