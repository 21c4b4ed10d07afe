//! AskEBL application binary - composition root.
//!
//! 1. Parse the CLI and install the tracing subscriber
//! 2. Load configuration from TOML, then apply its log level
//! 3. Open (and seed) the SQLite knowledge store
//! 4. Build the knowledge base and conversation engine
//! 5. Run the chat REPL, or one of the calculator/admin subcommands

mod cli;
mod repl;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};
use uuid::Uuid;

use askebl_chat::{ChatSession, ConversationEngine, KnowledgeBase, MemorySink, StoredSuggestions};
use askebl_core::config::AskEblConfig;
use askebl_storage::{seed_demo_data, Database, PopularQuestionRepository, SuggestionRepository};
use askebl_tools::{CurrencyConverter, EmiCalculator, LoanProduct, ToolError};

use cli::{CliArgs, Command};

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

fn open_database(config: &AskEblConfig) -> Result<Arc<Database>, Box<dyn Error>> {
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join(&config.storage.database_file);
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "SQLite database opened");
    Ok(Arc::new(db))
}

/// Builtin catalogs, optionally replaced from a TOML file, plus stored entries.
fn build_knowledge(
    args: &CliArgs,
    config: &AskEblConfig,
    db: Option<&Arc<Database>>,
) -> Result<KnowledgeBase, Box<dyn Error>> {
    let catalog_file = args
        .knowledge
        .clone()
        .or_else(|| config.knowledge.catalog_file.as_ref().map(PathBuf::from));

    let kb = match catalog_file {
        Some(path) => KnowledgeBase::load(&path)?,
        None => KnowledgeBase::builtin(),
    };

    match db {
        // Entries from a catalog file are kept when the store is empty.
        Some(db) => {
            let stored = kb.clone().with_store(db)?;
            if stored.is_empty() {
                Ok(kb)
            } else {
                Ok(stored)
            }
        }
        None => Ok(kb),
    }
}

async fn run_chat(args: &CliArgs, config: &AskEblConfig) -> Result<(), Box<dyn Error>> {
    let db = if args.no_store {
        tracing::info!("Knowledge store disabled; suggestions stay in memory");
        None
    } else {
        let db = open_database(config)?;
        if config.storage.seed_demo_data {
            seed_demo_data(&db)?;
        }
        Some(db)
    };

    let kb = build_knowledge(args, config, db.as_ref())?;
    let engine = Arc::new(ConversationEngine::new(kb, config.chat.clone()));

    match db {
        Some(db) => repl::run(ChatSession::new(engine, StoredSuggestions::new(db))).await?,
        None => repl::run(ChatSession::new(engine, MemorySink::new())).await?,
    }
    Ok(())
}

fn run_emi(
    principal: f64,
    years: u32,
    rate: Option<f64>,
    product: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let product = product.map(str::parse::<LoanProduct>).transpose()?;
    let rate = match (rate, product) {
        (Some(rate), _) => rate,
        (None, Some(product)) => product.default_rate(),
        (None, None) => {
            return Err(ToolError::InvalidInput(
                "give either --rate or --product".to_string(),
            )
            .into())
        }
    };

    let breakdown = EmiCalculator::calculate(principal, rate, years)?;
    if let Some(product) = product {
        println!("{product}");
    }
    println!("Monthly EMI:    BDT {:.0}", breakdown.monthly_installment);
    println!("Total payable:  BDT {:.0}", breakdown.total_payable);
    println!("Total interest: BDT {:.0}", breakdown.total_interest);
    println!("Installments:   {}", breakdown.months);
    Ok(())
}

fn run_convert(amount: f64, currency: &str) -> Result<(), Box<dyn Error>> {
    let converter = CurrencyConverter::indicative();
    let conversion = converter.convert(amount, currency)?;
    println!(
        "{} {} = BDT {:.2} (1 {} = {} BDT, indicative)",
        conversion.amount, conversion.code, conversion.bdt, conversion.code, conversion.rate
    );
    Ok(())
}

fn run_seed(config: &AskEblConfig) -> Result<(), Box<dyn Error>> {
    let db = open_database(config)?;
    let report = seed_demo_data(&db)?;
    println!(
        "Seeded {} FAQs and {} popular questions",
        report.faqs, report.popular_questions
    );
    Ok(())
}

fn run_suggestions(config: &AskEblConfig, limit: u64) -> Result<(), Box<dyn Error>> {
    let db = open_database(config)?;
    let rows = SuggestionRepository::new(db).list_recent(limit)?;
    if rows.is_empty() {
        println!("No suggested questions yet.");
    }
    for row in rows {
        println!(
            "{}  [{}]  {}",
            row.created_at.format("%Y-%m-%d %H:%M"),
            row.session_id,
            row.question
        );
    }
    Ok(())
}

/// Toggle a popular question when an id is given, then list the active ones.
fn run_popular(
    db: Arc<Database>,
    activate: Option<Uuid>,
    deactivate: Option<Uuid>,
) -> Result<(), Box<dyn Error>> {
    let repo = PopularQuestionRepository::new(db);

    let toggle = activate
        .map(|id| (id, true))
        .or_else(|| deactivate.map(|id| (id, false)));
    if let Some((id, active)) = toggle {
        if !repo.set_active(id, active)? {
            return Err(format!("no popular question with id {id}").into());
        }
        tracing::info!(%id, active, "Popular question updated");
    }

    let questions = repo.list_active()?;
    if questions.is_empty() {
        println!("No active popular questions.");
    }
    for q in questions {
        println!("{}  {:>2}  {}", q.id, q.display_order, q.entry.question);
    }
    Ok(())
}

/// Log level from the config file, applied only when neither `RUST_LOG` nor
/// `--log-level` chose one.
fn config_log_level<'a>(
    from_env: bool,
    cli_level: Option<&str>,
    config_level: &'a str,
) -> Option<&'a str> {
    if from_env || cli_level.is_some() {
        None
    } else {
        Some(config_level)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    let cli_level = args.resolve_log_level();

    // Tracing first, so config load failures are reported. Logs go to stderr
    // so they never interleave with chat output.
    let (initial_filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(cli_level.as_deref().unwrap_or("info")), false),
    };
    let (filter, filter_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting AskEBL v{}", env!("CARGO_PKG_VERSION"));

    // Config. Success and fallback are each logged by the loader.
    let config_file = args.resolve_config_path();
    let mut config = AskEblConfig::load_or_default(&config_file);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    let configured =
        config_log_level(from_env, cli_level.as_deref(), &config.general.log_level);
    if let Some(level) = configured {
        if let Err(e) = filter_handle.reload(EnvFilter::new(level)) {
            tracing::warn!(error = %e, "Failed to apply configured log level");
        }
    }
    if let Some(level) = cli_level {
        config.general.log_level = level;
    }

    match args.command() {
        Command::Chat => run_chat(&args, &config).await,
        Command::Emi {
            principal,
            years,
            rate,
            product,
        } => run_emi(*principal, *years, *rate, product.as_deref()),
        Command::Convert { amount, currency } => run_convert(*amount, currency),
        Command::Seed => run_seed(&config),
        Command::Suggestions { limit } => {
            if args.no_store {
                return Err("--no-store cannot be combined with the suggestions command".into());
            }
            run_suggestions(&config, *limit)
        }
        Command::Popular {
            activate,
            deactivate,
        } => {
            if args.no_store {
                return Err("--no-store cannot be combined with the popular command".into());
            }
            run_popular(open_database(&config)?, *activate, *deactivate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_plain() {
        assert_eq!(resolve_data_dir("/var/askebl"), PathBuf::from("/var/askebl"));
    }

    #[test]
    fn test_build_knowledge_prefers_store_entries() {
        let args = CliArgs::parse_from(["askebl"]);
        let config = AskEblConfig::default();
        let db = Arc::new(Database::in_memory().unwrap());
        seed_demo_data(&db).unwrap();

        let kb = build_knowledge(&args, &config, Some(&db)).unwrap();
        assert!(!kb.faqs.is_empty());
    }

    #[test]
    fn test_build_knowledge_without_store() {
        let args = CliArgs::parse_from(["askebl", "--no-store"]);
        let kb = build_knowledge(&args, &AskEblConfig::default(), None).unwrap();
        assert!(kb.is_empty());
        assert_eq!(kb.cards.items.len(), 5);
    }

    #[test]
    fn test_config_log_level_yields_to_env_and_cli() {
        assert_eq!(config_log_level(false, None, "debug"), Some("debug"));
        assert_eq!(config_log_level(true, None, "debug"), None);
        assert_eq!(config_log_level(false, Some("warn"), "debug"), None);
    }

    #[test]
    fn test_run_popular_toggles_by_id() {
        let db = Arc::new(Database::in_memory().unwrap());
        seed_demo_data(&db).unwrap();
        let repo = PopularQuestionRepository::new(db.clone());
        let first = repo.list_active().unwrap()[0].id;

        run_popular(db.clone(), None, Some(first)).unwrap();
        let active = repo.list_active().unwrap();
        assert_eq!(active.len(), 4);
        assert!(active.iter().all(|q| q.id != first));

        run_popular(db.clone(), Some(first), None).unwrap();
        assert_eq!(repo.list_active().unwrap().len(), 5);

        assert!(run_popular(db, None, Some(Uuid::new_v4())).is_err());
    }

    #[test]
    fn test_run_emi_needs_rate_or_product() {
        assert!(run_emi(100_000.0, 1, None, None).is_err());
        assert!(run_emi(100_000.0, 1, None, Some("home")).is_ok());
        assert!(run_emi(100_000.0, 1, None, Some("boat")).is_err());
    }
}
