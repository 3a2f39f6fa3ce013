use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration, printing one status line per migration.
///
/// Migrations already recorded in `seaql_migrations` are reported as skipped.
pub async fn run_all_migrations(url: &str) {
    let db = match sea_orm::Database::connect(url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "Could not open database:".red(), e);
            std::process::exit(1);
        }
    };

    println!("Running migrations on {}", url.bold());

    let pending: Vec<String> = match <migration::Migrator as MigratorTrait>::get_pending_migrations(&db).await
    {
        Ok(list) => list.iter().map(|m| m.name().to_string()).collect(),
        Err(e) => {
            eprintln!("{} {}", "Could not read migration history:".red(), e);
            std::process::exit(1);
        }
    };

    for step in <migration::Migrator as MigratorTrait>::migrations() {
        let name = step.name().to_string();
        if !pending.contains(&name) {
            print_status(&name);
            println!("{}", "skipped".yellow());
            continue;
        }

        print_status(&name);
        let start = Instant::now();
        let result = std::panic::AssertUnwindSafe(
            <migration::Migrator as MigratorTrait>::up(&db, Some(1)),
        )
        .catch_unwind()
        .await;

        match result {
            Ok(Ok(())) => {
                let time_str = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), time_str);
            }
            Ok(Err(e)) => {
                println!("{}", "failed".red());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
            Err(_) => {
                println!("{}", "panicked".red());
                std::process::exit(1);
            }
        }
    }
}

fn print_status(name: &str) {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{}{} ", label, dots);
    let _ = io::stdout().flush();
}
