//! Stickers CLI binary.
//!
//! Provides command-line interface for the sticker sales feature pipeline.

use clap::{Args, Parser, Subcommand};
use polars::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use std::process;
use stickers::prepare_features;
use stickers_data::{Dataset, SourcePaths};
use stickers_features::{
    CategoryField, FeatureGroup, FeatureSet, available_features, features_by_group,
};
use stickers_output::{
    ExportFormat, Exporter, FactorExport, MissingnessReport, SummaryDimension, daily_totals,
    features_to_frame, yearly_totals,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

#[derive(Parser)]
#[command(name = "stickers")]
#[command(about = "Seasonal feature engineering for daily sticker sales", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input file locations.
#[derive(Args)]
struct SourceArgs {
    /// Historical sales CSV
    #[arg(long, default_value = "train.csv")]
    train: PathBuf,

    /// Forecast sales CSV
    #[arg(long, default_value = "test.csv")]
    test: PathBuf,

    /// Economic indicator CSV (one column per year)
    #[arg(long, default_value = "gdp.csv")]
    gdp: PathBuf,

    /// Roster JSON; inferred from the sales files when omitted
    #[arg(long)]
    roster: Option<PathBuf>,
}

impl SourceArgs {
    fn paths(&self) -> SourcePaths {
        let paths = SourcePaths::new(&self.train, &self.test, &self.gdp);
        match &self.roster {
            Some(roster) => paths.with_roster(roster),
            None => paths,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Derive features for every record and export them
    Features {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Show store and product factors
    Factors {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output format (text, csv, json or pretty-json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Summarize historical sales and missing feature values
    Summary {
        #[command(flatten)]
        sources: SourceArgs,

        /// Only show yearly totals by this dimension (country, store, product)
        #[arg(long)]
        by: Option<String>,

        /// Show daily totals
        #[arg(long)]
        daily: bool,
    },

    /// List derived feature columns
    Columns {
        /// Filter by feature group
        #[arg(long)]
        group: Option<String>,

        /// Only list model input columns
        #[arg(long)]
        model_inputs: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) -> Result<(), TryInitError> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Features {
            sources,
            output,
            format,
        } => {
            let format: ExportFormat = format.parse()?;
            let set = load_features(&sources)?;
            match output {
                Some(path) => {
                    set.export_to_file(&path, format)?;
                    println!("Wrote {} rows to {}", set.len(), path.display());
                }
                None => print!("{}", set.export_to_string(format)?),
            }
        }
        Commands::Factors { sources, format } => {
            let set = load_features(&sources)?;
            show_factors(&set, &format)?;
        }
        Commands::Summary {
            sources,
            by,
            daily,
        } => {
            let dimensions = match by {
                Some(name) => vec![parse_dimension(&name)?],
                None => SummaryDimension::ALL.to_vec(),
            };
            let set = load_features(&sources)?;
            show_summary(&set, &dimensions, daily)?;
        }
        Commands::Columns {
            group,
            model_inputs,
        } => {
            let group = group.as_deref().map(parse_group).transpose()?;
            list_columns(group, model_inputs);
        }
    }

    Ok(())
}

fn load_features(sources: &SourceArgs) -> Result<FeatureSet, Box<dyn std::error::Error>> {
    let dataset = Dataset::load(&sources.paths())?;
    info!(
        records = dataset.records.len(),
        countries = dataset.roster.countries.len(),
        "dataset loaded"
    );
    Ok(prepare_features(&dataset)?)
}

fn show_factors(set: &FeatureSet, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format.eq_ignore_ascii_case("text") {
        for field in CategoryField::ALL {
            let factors = set.factors(field);
            println!("{} factors:", field);
            println!("{}", "=".repeat(48));
            for (category, factor) in factors.iter() {
                println!(
                    "{:<28} {:>10.2} ({} rows)",
                    category,
                    factor,
                    factors.observations(category)
                );
            }
            println!();
        }
        return Ok(());
    }

    let format: ExportFormat = format.parse()?;
    match format {
        ExportFormat::Csv => {
            let mut rows = FactorExport::from_factors(&set.store_factors);
            rows.extend(FactorExport::from_factors(&set.product_factors));
            print!("{}", rows.export_to_string(format)?);
        }
        ExportFormat::Json | ExportFormat::PrettyJson => {
            let output = json!({
                "store": FactorExport::from_factors(&set.store_factors),
                "product": FactorExport::from_factors(&set.product_factors),
            });
            let text = if format == ExportFormat::Json {
                serde_json::to_string(&output)?
            } else {
                serde_json::to_string_pretty(&output)?
            };
            println!("{}", text);
        }
    }
    Ok(())
}

fn show_summary(
    set: &FeatureSet,
    dimensions: &[SummaryDimension],
    daily: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = features_to_frame(set)?;

    for dimension in dimensions {
        let totals = yearly_totals(&frame, *dimension)?;
        let years = totals.column("year")?.i32()?;
        let keys = totals.column(dimension.column())?.str()?;
        let sums = totals.column("total_quantity")?.f64()?;

        println!("Yearly sales by {}:", dimension);
        println!("{:<6} {:<28} {:>14}", "year", dimension.column(), "num_sold");
        for i in 0..totals.height() {
            println!(
                "{:<6} {:<28} {:>14.0}",
                years.get(i).unwrap_or_default(),
                keys.get(i).unwrap_or_default(),
                sums.get(i).unwrap_or_default()
            );
        }
        println!();
    }

    if daily {
        let totals = daily_totals(&frame)?;
        let dates = totals.column("date")?.cast(&DataType::String)?;
        let dates = dates.str()?;
        let sums = totals.column("total_quantity")?.f64()?;

        println!("Daily sales:");
        for i in 0..totals.height() {
            println!(
                "{:<12} {:>10.0}",
                dates.get(i).unwrap_or_default(),
                sums.get(i).unwrap_or_default()
            );
        }
        println!();
    }

    println!("Missing values:");
    println!("{}", MissingnessReport::from_feature_set(set));
    Ok(())
}

fn list_columns(group: Option<FeatureGroup>, model_inputs: bool) {
    let features = match group {
        Some(group) => features_by_group(group),
        None => available_features(),
    };

    println!("Feature columns:");
    println!("================\n");
    for feature in features.iter().filter(|f| !model_inputs || f.model_input) {
        let marker = if feature.model_input { "*" } else { " " };
        println!(
            "{} {:<20} {:<10} {}",
            marker,
            feature.name,
            format!("{:?}", feature.group),
            feature.description
        );
    }
    println!("\n* model input");
}

fn parse_dimension(name: &str) -> Result<SummaryDimension, Box<dyn std::error::Error>> {
    let dimension = match name.to_lowercase().as_str() {
        "country" | "countries" => SummaryDimension::Country,
        "store" | "stores" => SummaryDimension::Store,
        "product" | "products" => SummaryDimension::Product,
        _ => return Err(format!("Unknown dimension: {}", name).into()),
    };
    Ok(dimension)
}

fn parse_group(name: &str) -> Result<FeatureGroup, Box<dyn std::error::Error>> {
    let group = match name.to_lowercase().as_str() {
        "calendar" => FeatureGroup::Calendar,
        "position" => FeatureGroup::Position,
        "harmonic" | "harmonics" => FeatureGroup::Harmonic,
        "economic" | "gdp" => FeatureGroup::Economic,
        "category" | "factor" | "factors" => FeatureGroup::Category,
        _ => return Err(format!("Unknown feature group: {}", name).into()),
    };
    Ok(group)
}
