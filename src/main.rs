use anyhow::Context;
use clap::{Parser, Subcommand};
use docsim_api::{CompareRequest, RestApi};
use docsim_similarity::{ComparisonEngine, EngineConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Document similarity from text semantics and handwriting features
#[derive(Parser, Debug)]
#[command(name = "docsim")]
#[command(about = "Compare documents by text and handwriting", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compare the two documents described by a request file and print the result
    Compare {
        /// Request file with `document1`, `document2` and optional `weight_text`
        #[arg(short, long)]
        input: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
}

fn load_engine(config: Option<&Path>) -> anyhow::Result<ComparisonEngine> {
    let config = match config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            EngineConfig::from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    Ok(ComparisonEngine::new(config)?)
}

fn run_compare(input: &Path, config: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let engine = load_engine(config)?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request: CompareRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid comparison request in {}", input.display()))?;

    let result = request.run(&engine)?;
    let summary = result.summary();
    info!(
        "Similarity index {:.4} ({} anomalies, {} variations, {} inconsistencies)",
        summary.similarity_index,
        summary.anomaly_count,
        summary.variation_count,
        summary.inconsistency_count
    );

    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);
    Ok(())
}

async fn serve(http_port: u16, config: Option<&Path>) -> anyhow::Result<()> {
    let engine = Arc::new(load_engine(config)?);
    info!("Engine initialized: {:?}", engine);

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(engine, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("docsim started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `compare` output stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting docsim v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Serve { http_port, config } => serve(http_port, config.as_deref()).await,
        Command::Compare { input, config, pretty } => {
            run_compare(&input, config.as_deref(), pretty)
        }
    }
}
