use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use menu_parser::core::Storage;
use menu_parser::utils::{logger, validation::Validate};
use menu_parser::{
    compose, LocalStorage, MenuDocument, MenuError, MessageFormat, Settings, WeekendPolicy,
};

#[derive(Parser)]
#[command(name = "daily-message")]
#[command(about = "Generate the daily school menu message")]
struct Args {
    /// Target date in YYYY-MM-DD format (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long)]
    output_file: Option<String>,

    /// Path to the menu JSON file (overrides MENU_JSON_PATH)
    #[arg(long)]
    json_path: Option<String>,

    /// Base URL of the menu website (overrides MENU_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Format the message for Telegram with HTML and emojis
    #[arg(long)]
    telegram: bool,

    /// Weekend handling: exact, previous or next
    #[arg(long, default_value = "exact")]
    weekend: WeekendPolicy,

    /// Optional TOML settings file; MENU_* environment variables are used otherwise
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, MenuError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MenuError::InvalidDate {
        value: value.to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    // 本機開發時從 .env 載入環境變數
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment variables from {}", path.display()),
        Err(_) => tracing::debug!("No .env file found, using system environment variables"),
    }

    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings file '{}'", path))?,
        None => Settings::from_env(),
    };

    // 命令列參數優先
    if let Some(json_path) = args.json_path {
        settings.json_path = json_path;
    }
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    settings.telegram |= args.telegram;

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    let target_date = match &args.date {
        Some(value) => parse_date(value)?,
        None => chrono::Local::now().date_naive(),
    };

    let storage = LocalStorage::new(".");
    let data = storage
        .read_file(&settings.json_path)
        .await
        .with_context(|| format!("Menu file not found: {}", settings.json_path))?;
    let document = MenuDocument::from_json_slice(&data)
        .with_context(|| format!("Invalid JSON in menu file: {}", settings.json_path))?;

    let format = if settings.telegram {
        MessageFormat::Telegram
    } else {
        MessageFormat::Plain
    };
    let message = compose(&document, target_date, &settings.base_url, format, args.weekend);

    match args.output_file {
        Some(path) => {
            storage
                .write_file(&path, message.as_bytes())
                .await
                .with_context(|| format!("Failed to write message to {}", path))?;
            tracing::info!("📁 Message written to: {}", path);
        }
        None => println!("{}", message),
    }

    Ok(())
}
