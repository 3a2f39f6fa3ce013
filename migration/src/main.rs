use std::{env, fs, path::Path};

mod runner;

/// `migration [up|fresh|clean]`
///
/// * `up` (default) applies pending migrations.
/// * `fresh` deletes the database file and migrates from scratch.
/// * `clean` only deletes the database file.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = env::var("DATABASE_PATH").expect("DATABASE_PATH must be set");
    let url = if db_path.starts_with("sqlite:") {
        db_path.clone()
    } else {
        format!("sqlite://{}?mode=rwc", db_path)
    };
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
        Some("up") | None => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
        Some(other) => {
            eprintln!("Unknown command '{other}'. Expected one of: up, fresh, clean");
            std::process::exit(2);
        }
    }
}

fn remove_db_file(path: &str) {
    if path.starts_with("sqlite:") {
        println!("Not a file path, nothing to delete: {}", path);
        return;
    }

    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(path: &str) {
    if path.starts_with("sqlite:") {
        return;
    }
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
