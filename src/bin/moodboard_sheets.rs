// Moodboard sheet CLI
//
// Purpose: Derive lifecycle facts for a materials catalogue and render A4 sheets
// Usage: cargo run --release --bin moodboard_sheets -- render --materials board.json --out sheets.pdf

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use moodboard_lab::lifecycle::seed_missing_profiles;
use moodboard_lab::{
    render_sheets, FactBuilder, LifecycleData, LifecycleResolver, MaterialRecord, PdfSurface, SheetConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moodboard_sheets", about = "Lifecycle fact sheets for moodboard materials")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Sheet layout config (JSON, any subset of fields)
    #[arg(long, global = true, env = "MOODBOARD_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Lifecycle reference data merged over the builtin tables (JSON)
    #[arg(long, global = true, env = "MOODBOARD_DATA", value_name = "FILE")]
    data: Option<PathBuf>,

    /// Materials catalogue (JSON array of material records)
    #[arg(long, global = true, value_name = "FILE")]
    materials: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render materials to a PDF sheet
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "moodboard-sheets.pdf")]
        out: PathBuf,
    },
    /// Print derived material facts as JSON
    Facts,
    /// Print the duration rule that matched each material
    Explain,
    /// Print template profiles for materials without a curated one
    SeedProfiles,
}

fn load_materials(path: Option<&Path>) -> Result<Vec<MaterialRecord>> {
    let path = path.context("--materials is required for this command")?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read materials: {:?}", path))?;
    let materials: Vec<MaterialRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse materials JSON: {:?}", path))?;

    tracing::info!("Loaded {} materials from {:?}", materials.len(), path);
    Ok(materials)
}

fn load_data(path: Option<&Path>) -> Result<LifecycleData> {
    match path {
        Some(path) => LifecycleData::load(path),
        None => LifecycleData::builtin().context("Builtin lifecycle data failed to compile"),
    }
}

fn main() -> Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodboard_lab=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.common.config {
        Some(path) => SheetConfig::load(path)?,
        None => SheetConfig::default(),
    };
    let data = load_data(cli.common.data.as_deref())?;
    let materials = load_materials(cli.common.materials.as_deref())?;

    match cli.command {
        Command::Render { out } => {
            let builder = FactBuilder::new(&data, config.building_life)?
                .with_landscape_factor(config.landscape_maintenance_factor);
            let facts = builder.build_all(&materials);

            let mut surface = PdfSurface::for_config(&config);
            let pages = render_sheets(&mut surface, &facts, &config);
            surface
                .save(&out)
                .with_context(|| format!("Failed to write PDF: {:?}", out))?;
            println!("Wrote {} pages to {}", pages, out.display());
        }
        Command::Facts => {
            let builder = FactBuilder::new(&data, config.building_life)?
                .with_landscape_factor(config.landscape_maintenance_factor);
            let facts = builder.build_all(&materials);
            println!("{}", serde_json::to_string_pretty(&facts)?);
        }
        Command::Explain => {
            let resolver = LifecycleResolver::new(&data)
                .with_landscape_factor(config.landscape_maintenance_factor);
            for material in &materials {
                let (duration, rule) = resolver.resolve_traced(material);
                let multiplier = resolver.lifecycle_multiplier(material, config.building_life)?;
                println!(
                    "{:<28} {:<44} {:>3}y / {:>3}y  x{}{}",
                    material.id,
                    rule.to_string(),
                    duration.service_life,
                    duration.replacement_cycle,
                    multiplier,
                    if resolver.is_landscape(material) { "  (landscape)" } else { "" }
                );
            }
        }
        Command::SeedProfiles => {
            let seeded = seed_missing_profiles(&data, &materials)
                .context("Material type patterns failed to compile")?;
            tracing::info!("Seeded {} of {} materials", seeded.len(), materials.len());
            println!("{}", serde_json::to_string_pretty(&seeded)?);
        }
    }

    Ok(())
}
