use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use vigil_cli::commands;
use vigil_cli::config::{self, VigilConfig};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Risk-assessment scoring engine")]
#[command(version)]
struct Cli {
    /// Path to config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active instruments
    List,
    /// Show an instrument's domains, items, and scoring table
    Show { id: String },
    /// Validate an instrument definition file
    Validate { path: PathBuf },
    /// Run an assessment from an answers file and submit it
    Assess {
        id: String,

        /// Subject (offender) reference recorded with the session
        #[arg(long)]
        subject: String,

        /// JSON object mapping item id to option value
        #[arg(long)]
        answers: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or write the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config
    Show,
    /// Write a config file
    Init {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn init_tracing(config: &VigilConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;
    config::apply_env(&mut config);
    init_tracing(&config);

    let assessor = commands::build_assessor(&config);

    match cli.command {
        Commands::List => {
            let summaries = assessor.list_instruments().await?;
            print!("{}", commands::render_summaries(&summaries));
        }
        Commands::Show { id } => {
            let instrument = assessor.instrument(&id).await?;
            print!("{}", commands::render_instrument(&instrument));
        }
        Commands::Validate { path } => {
            let instrument = commands::validate_file(&path)?;
            println!(
                "{} v{}: {} domains, {} items, {} scoring entries",
                instrument.id(),
                instrument.version(),
                instrument.domain_count(),
                instrument.item_count(),
                instrument.scoring_table().len()
            );
        }
        Commands::Assess {
            id,
            subject,
            answers,
            json,
        } => {
            let answers = commands::load_answers(&answers)?;
            let report = commands::run_assessment(&assessor, &id, &subject, &answers).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", commands::render_report(&report));
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => println!("{}", serde_json::to_string_pretty(&config)?),
            ConfigAction::Init { data_dir } => {
                let path = match cli.config {
                    Some(path) => path,
                    None => config::default_config_path()?,
                };
                let fresh = VigilConfig {
                    data_dir,
                    ..VigilConfig::default()
                };
                config::save_config(&path, &fresh)?;
                println!("wrote {}", path.display());
            }
        },
    }

    Ok(())
}
