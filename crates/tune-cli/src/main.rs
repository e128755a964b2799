use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline::{Pipeline, Settings};
use tune_core::{AttributeKind, CategorySet};

/// tune – generate music clips from text or images using the configured model servers.
#[derive(Parser, Debug)]
#[command(name = "tune", version, about = "Text/image to music from the command line")]
struct Cli {
    /// TOML settings file (same format as the API service)
    #[arg(long, global = true, env = "TUNE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate from a text prompt (translated to English if needed)
    Text {
        /// The prompt; read from STDIN when omitted
        #[arg(long)]
        text: Option<String>,
    },

    /// Generate from an image's genre/theme/mood tags
    Image {
        #[arg(long)]
        input: PathBuf,
    },

    /// Print an image's genre/theme/mood tags as JSON without generating
    Tags {
        #[arg(long)]
        input: PathBuf,
    },

    /// Validate the category tables and list their labels
    Categories {
        /// genre, theme or mood; all three when omitted
        #[arg(long)]
        kind: Option<AttributeKind>,
    },
}

fn read_stdin_string() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("failed reading STDIN")?;
    Ok(buf)
}

fn read_image(path: &PathBuf) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Categories { kind } => {
            let set = CategorySet::load_dir(&settings.categories_dir)?;
            let kinds = kind.map(|k| vec![k]).unwrap_or_else(|| AttributeKind::ALL.to_vec());
            for k in kinds {
                let mapping = set.get(k);
                println!("{k} ({}):", mapping.len());
                for c in mapping {
                    println!("  {:<14} {} keywords", c.name, c.keywords.len());
                }
            }
        }
        Commands::Tags { input } => {
            let pipeline = Pipeline::from_settings(&settings)?;
            let details = pipeline.describe_image(read_image(&input)?).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Commands::Text { text } => {
            let text = match text {
                Some(t) => t,
                None => read_stdin_string()?,
            };
            let pipeline = Pipeline::from_settings(&settings)?;
            let out = pipeline.text_to_music(&text).await?;
            eprintln!("prompt: {}", out.prompt);
            for p in &out.file_paths {
                println!("{}", p.display());
            }
        }
        Commands::Image { input } => {
            let pipeline = Pipeline::from_settings(&settings)?;
            let out = pipeline.image_to_music(read_image(&input)?).await?;
            eprintln!("prompt: {}", out.prompt);
            for p in &out.file_paths {
                println!("{}", p.display());
            }
        }
    }
    Ok(())
}
