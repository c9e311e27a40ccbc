//! Enrollview CLI
//!
//! Command-line access to the dashboard views:
//! - Inspect the dataset (summary, years)
//! - Print any view as a table, JSON or CSV
//! - Run the API server
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use enrollview::api::{serve, AppState};
use enrollview::config::{generate_default_config, Config};
use enrollview::dataset::{load_dataset, Dataset, DatasetSource, SchoolYear};
use enrollview::views::{render_text, write_csv, Dashboard, Tabular, ViewSelection};

#[derive(Parser)]
#[command(name = "enrollview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Senior High School enrollment and congestion views")]
#[command(long_about = "Enrollview loads a regional enrollment spreadsheet and prepares the \
dashboard views:\nnational totals, regional congestion trends, public vs private enrollment \
and the congestion ranking.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dataset file (.xlsx, .xls, .ods or .csv), overrides the configured path
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Worksheet to read (default: first sheet)
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dataset source, columns detected and row counts
    Summary,

    /// List school years in chronological order
    Years,

    /// National SHS enrollment vs infrastructure per year
    National,

    /// SHS congestion trends in the focus regions
    Regional,

    /// Public vs private SHS enrollment for two years
    Sector {
        /// First year (default: earliest)
        #[arg(long)]
        year_a: Option<SchoolYear>,
        /// Second year (default: latest)
        #[arg(long)]
        year_b: Option<SchoolYear>,
    },

    /// Regions ranked by SHS congestion
    Ranking {
        /// School year (default: latest)
        #[arg(short, long)]
        year: Option<SchoolYear>,
    },

    /// Raw SHS rows with learners per facility
    Raw {
        /// Print at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run the API server
    Serve {
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let config = enrollview::logging::with_bootstrap(|| load_config(&cli))?;
    enrollview::logging::init(&config.logging)?;

    match cli.command {
        Commands::Serve { host, port } => run_server(config, host, port).await,
        command => run_view(command, &config, cli.format),
    }
}

/// Config file plus command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(file) = &cli.file {
        config.dataset.default_path = file.clone();
    }
    if let Some(sheet) = &cli.sheet {
        config.dataset.sheet = Some(sheet.clone());
    }
    Ok(config)
}

async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.api.host = host;
    }
    if let Some(port) = port {
        config.api.port = port;
    }

    tracing::info!("Starting Enrollview API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Default dataset: {}", config.dataset.default_path.display());
    serve(AppState::new(&config)).await?;
    Ok(())
}

fn run_view(command: Commands, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let source = config.dataset.default_source();
    let dataset = load(&source, config)?;
    let regions = config.regions.filter();
    let sectors = config.views.sector_allow_list();
    let dashboard = Dashboard::new(&dataset, &regions, &sectors);

    match command {
        Commands::Summary => {
            let summary = dashboard.summary(source.to_string());
            match format {
                OutputFormat::Json => print_json(&summary)?,
                _ => {
                    println!("Source:       {}", summary.source);
                    println!("Rows:         {}", summary.rows);
                    println!("SHS rows:     {}", summary.shs_rows);
                    println!("School years: {}", join(&summary.years));
                    println!("Columns detected:");
                    for column in &summary.columns {
                        println!("  - {}", column);
                    }
                }
            }
        }

        Commands::Years => match format {
            OutputFormat::Json => print_json(dashboard.years())?,
            _ => {
                for year in dashboard.years() {
                    println!("{}", year);
                }
            }
        },

        Commands::National => print_view(&dashboard.national(), format)?,

        Commands::Regional => print_view(&dashboard.regional(), format)?,

        Commands::Sector { year_a, year_b } => {
            let selection = ViewSelection {
                year_a,
                year_b,
                ..Default::default()
            };
            let view = dashboard.sector(dashboard.resolve(&selection).compare);
            print_view(&view, format)?;
        }

        Commands::Ranking { year } => {
            let selection = ViewSelection {
                ranking_year: year,
                ..Default::default()
            };
            let view = dashboard.ranking(dashboard.resolve(&selection).ranking_year);
            print_view(&view, format)?;
        }

        Commands::Raw { limit } => {
            let mut view = dashboard.raw();
            if let Some(limit) = limit {
                view.rows.truncate(limit);
            }
            print_view(&view, format)?;
        }

        Commands::Serve { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

/// Load the dataset, reporting failures with the generic message
fn load(source: &DatasetSource, config: &Config) -> anyhow::Result<Dataset> {
    load_dataset(source, &config.dataset.load_options()).map_err(|e| {
        tracing::error!(source = %source, "Dataset load failed: {}", e);
        anyhow::anyhow!(e.user_message())
    })
}

/// Print a view with its title and caption
fn print_view<V>(view: &V, format: OutputFormat) -> anyhow::Result<()>
where
    V: Tabular + Serialize + Titled,
{
    match format {
        OutputFormat::Json => print_json(view)?,
        OutputFormat::Csv => write_csv(view, std::io::stdout().lock())?,
        OutputFormat::Table => {
            println!("{}", view.title());
            println!();
            if view.text_rows().is_empty() {
                println!("No data.");
            } else {
                print!("{}", render_text(view));
            }
            if let Some(caption) = view.caption() {
                println!();
                println!("{}", caption);
            }
        }
    }
    Ok(())
}

trait Titled {
    fn title(&self) -> &str;
    fn caption(&self) -> Option<&str>;
}

impl<R> Titled for enrollview::views::View<R> {
    fn title(&self) -> &str {
        &self.chart.title
    }

    fn caption(&self) -> Option<&str> {
        Some(&self.caption)
    }
}

impl Titled for enrollview::views::RawView {
    fn title(&self) -> &str {
        &self.chart.title
    }

    fn caption(&self) -> Option<&str> {
        None
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn join(years: &[SchoolYear]) -> String {
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
