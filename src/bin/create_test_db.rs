use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use ledgerbook::{
    Amount, initialize_db,
    category::{CategoryName, create_category},
    transaction::{Transaction, TransactionType, create_transaction},
    user::create_user,
};

/// A utility for creating a test database for ledgerbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user("test", &conn)?;

    println!("Creating categories...");
    let salary = create_category(
        user.id,
        CategoryName::new("Salary")?,
        "Pay from work",
        &conn,
    )?;
    let groceries = create_category(user.id, CategoryName::new("Groceries")?, "", &conn)?;
    let rent = create_category(user.id, CategoryName::new("Rent")?, "", &conn)?;

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    // Roughly three months of activity, one entry every few days.
    for days_ago in (0..90).step_by(3) {
        let date = today - Duration::days(days_ago);

        let (category_id, transaction_type, cents, note) = match days_ago % 14 {
            0 => (salary.id, TransactionType::Income, 2_500_00, "Fortnightly pay"),
            3 => (rent.id, TransactionType::Expense, 650_00, "Rent"),
            _ => (
                groceries.id,
                TransactionType::Expense,
                // Vary the amount so listings are easier to tell apart.
                40_00 + days_ago * 137 % 60_00,
                "Supermarket",
            ),
        };

        let amount = Amount::new(Decimal::new(cents, 2))?;
        create_transaction(
            user.id,
            Transaction::build(amount, transaction_type, date, category_id).note(note),
            today,
            &conn,
        )?;
        count += 1;
    }

    println!("Created {count} transactions for user \"{}\"", user.username);
    println!("Success!");

    Ok(())
}
