//! Writes artificial glacier DEMs as NetCDF input for flux routing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use artidem_core::dataset::{named_output, read_dataset, DatasetWriter, SchemaVersion};
use artidem_core::generator::generate_island;
use artidem_core::geometry::Geometry;
use artidem_core::presets::{inclined_planes, notched_square};
use artidem_core::DemConfig;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artidem", about = "Generate artificial glacier DEMs for flux routing")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Noise island with a single melt cell.
    Island {
        /// JSON config file; missing keys take their defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dataset layout: v1, v2 or v3.
        #[arg(short, long)]
        schema: Option<SchemaVersion>,

        #[arg(long)]
        seed: Option<u32>,
    },

    /// Hand-authored square with a border ridge and one sea-level notch.
    Notch {
        #[arg(long, default_value = "7")]
        size: usize,

        #[arg(short, long, default_value = "notch.nc")]
        output: PathBuf,

        #[arg(short, long, default_value = "v3")]
        schema: SchemaVersion,

        /// Sea level for the ice-type mask.
        #[arg(long, default_value = "0")]
        mask_level: f32,
    },

    /// Eight inclined test planes, one file each.
    Planes {
        #[arg(long, default_value = "10")]
        size: usize,

        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(short, long, default_value = "v3")]
        schema: SchemaVersion,
    },

    /// Print the dimensions, variables, and attributes of a dataset.
    Inspect { path: PathBuf },

    /// Print the default island config as JSON.
    DefaultConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Args::parse().command {
        Command::Island { config, output, schema, seed } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => DemConfig::default(),
            };
            if let Some(output) = output {
                config.output = output;
            }
            if let Some(schema) = schema {
                config.schema = schema;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            let geometry = generate_island(&config).context("generating island")?;
            write(&geometry, &config.output, config.schema)?;
        }
        Command::Notch { size, output, schema, mask_level } => {
            let surface = notched_square(size).context("building notched square")?;
            let geometry = Geometry::from_surface(surface)?.with_mask(mask_level);
            write(&geometry, &output, schema)?;
        }
        Command::Planes { size, output_dir, schema } => {
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating {}", output_dir.display()))?;
            for plane in inclined_planes(size).context("building inclined planes")? {
                let (mx, my) = plane.melt;
                let geometry = Geometry::from_surface(plane.surface)?.with_melt_at(mx, my)?;
                write(&geometry, &named_output(&output_dir, "plane", plane.name), schema)?;
            }
        }
        Command::Inspect { path } => inspect(&path)?,
        Command::DefaultConfig => println!("{}", DemConfig::default().to_json_pretty()?),
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<DemConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DemConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn write(geometry: &Geometry, path: &Path, schema: SchemaVersion) -> Result<()> {
    DatasetWriter::new(schema)
        .write(geometry, path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "done");
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let contents = read_dataset(path).with_context(|| format!("reading {}", path.display()))?;
    println!("{}", path.display());
    println!("  dimensions: x = {}, y = {}", contents.nx, contents.ny);
    println!("  global attributes:");
    for (key, value) in &contents.global_attributes {
        println!("    {key} = {value:?}");
    }
    println!("  variables:");
    for (name, dims) in &contents.dimensions {
        let range = contents
            .grids
            .get(name)
            .map(|f| format!("  [{:.3}, {:.3}]", f.min_value(), f.max_value()))
            .unwrap_or_default();
        println!("    {name} ({}){range}", dims.join(", "));
        if let Some(attrs) = contents.variable_attributes.get(name) {
            for (key, value) in attrs {
                println!("      {key} = {value:?}");
            }
        }
    }
    Ok(())
}
