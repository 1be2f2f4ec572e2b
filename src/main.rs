use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use outrigger_pressure::logging::setup_logging;
use outrigger_pressure::normalizer::{NormalizeConfig, normalize_from_config};
use outrigger_pressure::physics::{PressureEngine, PressureQuery, soil_capacities};
use outrigger_pressure::types::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Named soil classes with typical allowable bearing capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SoilClass {
    SoftClay,
    MediumClay,
    StiffClay,
    LooseSand,
    DenseSand,
    Gravel,
    SoftRock,
    HardRock,
    Paved,
}

impl SoilClass {
    fn capacity(self) -> GroundBearingPressure {
        match self {
            SoilClass::SoftClay => soil_capacities::soft_clay(),
            SoilClass::MediumClay => soil_capacities::medium_clay(),
            SoilClass::StiffClay => soil_capacities::stiff_clay(),
            SoilClass::LooseSand => soil_capacities::loose_sand(),
            SoilClass::DenseSand => soil_capacities::dense_sand(),
            SoilClass::Gravel => soil_capacities::gravel(),
            SoilClass::SoftRock => soil_capacities::soft_rock(),
            SoilClass::HardRock => soil_capacities::hard_rock(),
            SoilClass::Paved => soil_capacities::paved_surface(),
        }
    }
}

#[derive(Parser)]
#[command(name = "outrigger-pressure")]
#[command(version)]
#[command(about = "Outrigger ground bearing pressure from crane load tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dataset from load table sheets
    Normalize {
        /// Normalization config (TOML)
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Output dataset path, overrides the config
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Ground pressure for one configuration
    Calculate {
        /// Dataset JSON written by `normalize`
        #[arg(long, short = 'd')]
        dataset: PathBuf,

        #[arg(long)]
        crane_model: String,

        /// Counterweight in tonnes
        #[arg(long)]
        counterweight: f64,

        /// Outrigger base name as in the load tables
        #[arg(long)]
        base: String,

        /// Working radius in metres
        #[arg(long)]
        radius: f64,

        #[arg(long)]
        slew: String,

        /// Pad width in metres
        #[arg(long)]
        pad_width: f64,

        /// Pad length in metres
        #[arg(long)]
        pad_length: f64,

        /// Allowable soil bearing capacity in kPa
        #[arg(long, conflicts_with = "soil", required_unless_present = "soil")]
        soil_capacity: Option<f64>,

        /// Typical capacity for a soil class instead of a number
        #[arg(long, value_enum)]
        soil: Option<SoilClass>,

        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Configurations covered by a dataset
    List {
        #[arg(long, short = 'd')]
        dataset: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Normalize { config, output } => {
            let mut config = NormalizeConfig::from_file(&config)
                .with_context(|| format!("Failed to load config: {}", config.display()))?;
            if let Some(output) = output {
                config.output = output;
            }

            let result = normalize_from_config(&config).context("Normalization failed")?;
            result
                .records
                .to_json_file(&config.output)
                .with_context(|| format!("Failed to write dataset: {}", config.output.display()))?;

            println!(
                "Exported {} records to {}",
                result.records.len(),
                config.output.display()
            );
        }

        Commands::Calculate {
            dataset,
            crane_model,
            counterweight,
            base,
            radius,
            slew,
            pad_width,
            pad_length,
            soil_capacity,
            soil,
            format,
        } => {
            let soil_capacity_kpa = match (soil_capacity, soil) {
                (Some(kpa), _) => kpa,
                (None, Some(class)) => class.capacity().get::<kilopascal>(),
                (None, None) => bail!("Either --soil-capacity or --soil is required"),
            };

            let engine = PressureEngine::from_json_file(&dataset)
                .with_context(|| format!("Failed to load dataset: {}", dataset.display()))?;

            let query = PressureQuery {
                crane_model,
                counterweight_t: counterweight,
                outrigger_base: base,
                radius_m: radius,
                slew_position: slew,
                pad_width_m: pad_width,
                pad_length_m: pad_length,
                soil_capacity_kpa,
            };
            let result = engine.evaluate(&query);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => print!("{}", result.summary()),
            }
        }

        Commands::List { dataset } => {
            let engine = PressureEngine::from_json_file(&dataset)
                .with_context(|| format!("Failed to load dataset: {}", dataset.display()))?;
            let records = engine.record_set();

            println!("{} records", records.len());
            for model in records.crane_models() {
                println!("\n{}", model);
                for counterweight in records.counterweights(&model) {
                    println!(" {}", DisplayMass(Weight::new::<metric_ton>(counterweight)));
                    for base in records.outrigger_bases(&model, counterweight) {
                        println!("  - {}", base);
                    }
                }
            }
        }
    }

    Ok(())
}
