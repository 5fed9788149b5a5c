//! cert-console command line.
//!
//! ```text
//! cert-console [--config console.toml] cache [--timeout-secs 30]
//! cert-console validate --kind tencent-cos --file draft.json
//! cert-console targets
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use cert_console::config::{load_or_default, ConsoleConfig};
use cert_console::deploy::{DeployEditSession, DeployTarget, FormController, FormRegistry};
use cert_console::i18n::{Catalog, Translate};
use cert_console::observability::{logging, metrics};
use cert_console::{ApiClient, ConfigStore};

#[derive(Parser)]
#[command(name = "cert-console")]
#[command(about = "Reference data and deployment target checks for the certificate console", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch credentials, credential groups and notification emails
    Cache {
        /// Give up waiting for the backend after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Validate a deployment target draft (JSON) against its form
    Validate {
        #[arg(short, long)]
        kind: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List deployment target kinds and their fields
    Targets,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::debug!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let result = match cli.command {
        Commands::Cache { timeout_secs } => run_cache(&config, timeout_secs).await,
        Commands::Validate { kind, file } => run_validate(&config, &kind, &file),
        Commands::Targets => run_targets(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn translator(config: &ConsoleConfig) -> Result<Arc<dyn Translate>, Box<dyn std::error::Error>> {
    let catalog = match &config.locale.catalog_path {
        Some(path) => Catalog::builtin_with_overrides(std::path::Path::new(path))?,
        None => Catalog::builtin(),
    };
    Ok(Arc::new(catalog))
}

async fn run_cache(config: &ConsoleConfig, timeout_secs: u64) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let client = ApiClient::new(config.api.clone(), config.retries.clone())?;
    let store = ConfigStore::mount(client);

    let state = match tokio::time::timeout(Duration::from_secs(timeout_secs), store.wait_until_settled()).await {
        Ok(state) => state,
        Err(_) => {
            store.unmount();
            return Err(format!("backend did not answer within {} seconds", timeout_secs).into());
        }
    };

    println!("{}", serde_json::to_string_pretty(state.as_ref())?);

    let failed = cert_console::store::Slice::ALL
        .iter()
        .any(|s| !matches!(state.status.get(*s), cert_console::store::LoadStatus::Ready));
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_validate(
    config: &ConsoleConfig,
    kind: &str,
    file: &std::path::Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let registry = FormRegistry::builtin();
    let form = registry
        .get(kind)
        .ok_or_else(|| format!("unknown target kind '{}'", kind))?;

    let content = std::fs::read_to_string(file)?;
    let mut target: DeployTarget = serde_json::from_str(&content)?;
    if target.kind.is_empty() {
        target.kind = kind.to_string();
    }

    let mut controller = FormController::new(form, DeployEditSession::new(target), translator(config)?);
    let errors = controller.mount();

    let report = serde_json::json!({
        "config": controller.session().config().as_ref(),
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if errors.is_valid() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run_targets(config: &ConsoleConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let t = translator(config)?;
    let registry = FormRegistry::builtin();

    for kind in registry.kinds() {
        println!("{}", kind);
        if let Some(form) = registry.get(kind) {
            for field in form.fields() {
                println!("  {:<10} {}", field.name, t.t(field.label_key));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
