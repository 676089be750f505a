use libmask::{Channel, Fragment};
use maskr::{image_to_mask, inspect_image, mask_to_image};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the top-left pixel of the mask sits relative to the stream's starting cursor
#[derive(Args)]
struct Origin {
    /// Column of the top-left pixel
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_x: i32,
    /// Row of the top-left pixel
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_y: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// encodes one channel of an image as a mask stream
    #[command(name = "encode")]
    ImageToMask {
        /// The image
        img_file: PathBuf,
        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// The channel holding the palette indexes (alpha, luma)
        #[arg(short, long, default_value_t = Channel::Alpha)]
        channel: Channel,
        #[command(flatten)]
        origin: Origin,
    },

    /// draws a mask stream as a grayscale image
    #[command(name = "decode")]
    MaskToImage {
        /// The mask stream
        mask_file: PathBuf,
        /// Width of the drawn image
        #[arg(long)]
        width: u16,
        /// Height of the drawn image
        #[arg(long)]
        height: u16,
        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        origin: Origin,
    },

    /// lists the fragments an image decomposes into
    Inspect {
        /// The image
        img_file: PathBuf,
        /// The channel holding the palette indexes (alpha, luma)
        #[arg(short, long, default_value_t = Channel::Alpha)]
        channel: Channel,
        #[command(flatten)]
        origin: Origin,
    },
}

fn sibling(file: &Path, suffix: &str) -> Result<PathBuf> {
    let mut output = PathBuf::new();
    let Some(dir) = file.parent() else {
        bail!("Invalid input file");
    };
    let Some(Some(filename)) = file.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid input file");
    };
    output.push(dir);
    output.push(format!("{filename}.{suffix}"));
    info!("output name: {}", output.display());
    Ok(output)
}

fn print_fragment(fragment: &Fragment) {
    let kind: &'static str = fragment.kind.into();
    let b = fragment.bounds;
    println!(
        "{kind:<8} value={:<3} x={}..={} y={}..={}",
        fragment.value, b.min_x, b.max_x, b.min_y, b.max_y
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    match cli.command {
        Commands::ImageToMask {
            img_file,
            output,
            channel,
            origin,
        } => {
            let output = match output {
                Some(o) => o,
                None => sibling(&img_file, "mask")?,
            };
            let count =
                image_to_mask(&img_file, &output, channel, (origin.origin_x, origin.origin_y))?;
            info!("{count} instructions");
        }
        Commands::MaskToImage {
            mask_file,
            width,
            height,
            output,
            origin,
        } => {
            let output = match output {
                Some(o) => o,
                None => sibling(&mask_file, "png")?,
            };
            let count = mask_to_image(
                &mask_file,
                &output,
                (width, height),
                (origin.origin_x, origin.origin_y),
            )?;
            info!("{count} instructions");
        }
        Commands::Inspect {
            img_file,
            channel,
            origin,
        } => {
            let fragments = inspect_image(&img_file, channel, (origin.origin_x, origin.origin_y))?;
            for fragment in &fragments {
                print_fragment(fragment);
            }
            info!("{} fragments", fragments.len());
        }
    }
    Ok(())
}
