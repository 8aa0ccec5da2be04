//! reportpage CLI - query paged reports from the command line or serve them
//!
//! Usage:
//!   reportpage metadata <report-id> --pages-to-load <n>
//!   reportpage data <report-id> --page-index <i> --pages-to-load <n>
//!   reportpage serve [--port <port>]
//!
//! Examples:
//!   reportpage metadata custdataset_orders --pages-to-load 5
//!   reportpage data customsearch_open --page-index 0 --pages-to-load 2 --fixtures demo.json

use clap::{Parser, Subcommand};
use reportpage::config::{Settings, StoreBackend};
use reportpage::query::{QueryEngine, QueryResponse, QueryResult, RequestParams};
use reportpage::{logging, store, QueryError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "reportpage")]
#[command(about = "reportpage - paged access to large dataset and saved search reports")]
#[command(version)]
struct Cli {
    /// Path to a reportpage.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Serve reports from a JSON fixtures file instead of the configured store
    #[arg(short, long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report name, type and row/page counts
    Metadata {
        /// Dataset or saved search id
        report_id: String,

        /// Native pages per output page
        #[arg(short = 'n', long)]
        pages_to_load: String,
    },

    /// One output page of flattened rows
    Data {
        /// Dataset or saved search id
        report_id: String,

        /// 0-based output page index
        #[arg(short = 'i', long)]
        page_index: String,

        /// Native pages per output page
        #[arg(short = 'n', long)]
        pages_to_load: String,
    },

    /// Serve the HTTP API
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load_from(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &cli.fixtures {
        settings.store.backend = StoreBackend::Fixtures;
        settings.store.fixtures = Some(path.display().to_string());
    }

    if let Err(e) = logging::init(&settings.logging) {
        eprintln!("Error initialising logging: {}", e);
        return ExitCode::FAILURE;
    }

    let store = match store::open(&settings.store).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening report store: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let engine = QueryEngine::new(store).with_options(settings.query_options());

    match cli.command {
        Commands::Metadata {
            report_id,
            pages_to_load,
        } => {
            let params = RequestParams::new(report_id).with_pages_to_load(pages_to_load);
            print_response(engine.metadata_from_params(&params).await)
        }
        Commands::Data {
            report_id,
            page_index,
            pages_to_load,
        } => {
            let params = RequestParams::new(report_id)
                .with_page_index(page_index)
                .with_pages_to_load(pages_to_load);
            print_response(engine.data_from_params(&params).await)
        }
        #[cfg(feature = "server")]
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            match reportpage::web::serve(engine, &settings.server).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Server error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn print_response(result: Result<QueryResult, QueryError>) -> ExitCode {
    let response = QueryResponse::from(result);
    let code = if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error encoding response: {}", e);
            return ExitCode::FAILURE;
        }
    }
    code
}
