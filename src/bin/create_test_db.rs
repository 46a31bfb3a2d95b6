use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{
    Kind, NewTransaction, PasswordHash, ValidatedPassword, create_transaction, create_user,
    get_categories, initialize_db, seed_default_categories,
};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The email of the test user.
    #[arg(long, default_value = "test@example.com")]
    email: String,

    /// The password of the test user.
    #[arg(long, default_value = "test")]
    password: String,
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

    println!("Creating test user {}...", args.email);

    let password_hash = PasswordHash::new(
        ValidatedPassword::new(&args.password)?,
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(&args.email, Some("Test User"), password_hash, &conn)?;

    println!("Creating default categories...");
    seed_default_categories(user.id, &conn)?;
    let categories = get_categories(user.id, None, &conn)?;

    println!("Creating transactions for the last 90 days...");
    let today = OffsetDateTime::now_utc().date().midnight().assume_utc();
    let expenses: Vec<_> = categories
        .iter()
        .filter(|category| category.kind == Kind::Expense)
        .collect();
    let salary = categories
        .iter()
        .find(|category| category.kind == Kind::Income && category.name.as_ref() == "Salary");
    let mut count = 0;

    for days_ago in 0..90i64 {
        let date = today - Duration::days(days_ago);

        // Cycle through the expense categories so every one gets some spending.
        let category = expenses[days_ago as usize % expenses.len()];
        create_transaction(
            user.id,
            NewTransaction {
                amount: 5_000 + (days_ago * 1_337) % 45_000,
                kind: Kind::Expense,
                date,
                category_id: category.id,
                note: None,
            },
            &conn,
        )?;
        count += 1;

        if let (1, Some(salary)) = (date.day(), salary) {
            create_transaction(
                user.id,
                NewTransaction {
                    amount: 500_000,
                    kind: Kind::Income,
                    date,
                    category_id: salary.id,
                    note: Some("Monthly salary".to_owned()),
                },
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
