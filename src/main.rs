//! # Zplify CLI
//!
//! Command-line interface for converting images into ZPL II labels.
//!
//! ## Usage
//!
//! ```bash
//! # List encodings and dithering algorithms
//! zplify list
//!
//! # Convert a PNG into a compressed-hex label on stdout
//! zplify convert logo.png
//!
//! # 4 inch wide label at 203 DPI, Z64 payload, dithered, two copies
//! zplify convert --width-mm 101.6 --keep-aspect --encoding z64 \
//!     --dither atkinson --quantity 2 -o logo.zpl logo.png
//!
//! # Defaults from a config file, overridden by flags
//! zplify convert --config label.json --label-top 10 page1.png page2.png
//!
//! # Save the black and white preview next to the label
//! zplify convert --preview preview.png -o logo.zpl logo.png
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{LevelFilter, info};

use zplify::{
    ConvertConfig, DitheringAlgorithm, EncodingKind, Rotation, ZplError, convert, raster,
    raster::prepare,
};

/// Zplify - Image to ZPL II label converter
#[derive(Parser, Debug)]
#[command(name = "zplify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert images into ZPL labels
    Convert(ConvertArgs),

    /// List available encodings and dithering algorithms
    List,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Input images (one label per image)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write labels to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON config with "zpl" and "raster" sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Payload encoding (hex, hex-compressed, base64, base64-compressed)
    #[arg(long)]
    encoding: Option<EncodingKind>,

    /// Luminance threshold below which pixels print black
    #[arg(long)]
    threshold: Option<u8>,

    /// Dithering algorithm (none, floyd-steinberg, atkinson)
    #[arg(long)]
    dither: Option<DitheringAlgorithm>,

    /// Output only the ^GFA graphic field
    #[arg(long)]
    graphic_field_only: bool,

    /// Emit ^LL with the image height
    #[arg(long)]
    label_length: bool,

    /// Print quantity (^PQ); 0 omits it
    #[arg(long)]
    quantity: Option<u32>,

    /// Move content down by DOTS (0..=120)
    #[arg(long, value_name = "DOTS", allow_negative_numbers = true)]
    label_top: Option<i8>,

    /// Move content right by -DOTS (-9999..=0)
    #[arg(long, value_name = "DOTS", allow_negative_numbers = true)]
    label_shift: Option<i16>,

    /// Target width in dots
    #[arg(long, conflicts_with = "width_mm")]
    width: Option<u32>,

    /// Target height in dots
    #[arg(long, conflicts_with = "height_mm")]
    height: Option<u32>,

    /// Target width in millimetres (uses --dpi)
    #[arg(long)]
    width_mm: Option<f32>,

    /// Target height in millimetres (uses --dpi)
    #[arg(long)]
    height_mm: Option<f32>,

    /// Printer resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Keep the source aspect ratio when resizing
    #[arg(long)]
    keep_aspect: bool,

    /// Rotate clockwise by 0, 90, 180 or 270 degrees
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<Rotation>,

    /// Background colour as RRGGBB or RRGGBBAA
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Save the black and white raster as PNG
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(command: Commands) -> Result<(), ZplError> {
    match command {
        Commands::List => {
            println!("Encodings:");
            for kind in EncodingKind::ALL {
                println!("  {:<20} {}", kind.id(), kind.description());
            }
            println!("\nDithering algorithms:");
            for algorithm in DitheringAlgorithm::ALL {
                println!("  {}", algorithm);
            }
            Ok(())
        }
        Commands::Convert(args) => convert_files(args),
    }
}

/// Config file (or defaults) with command-line flags applied on top.
fn build_config(args: &ConvertArgs) -> Result<ConvertConfig, ZplError> {
    let mut config = match &args.config {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };

    let zpl = &mut config.zpl;
    if let Some(encoding) = args.encoding {
        zpl.encoding = encoding;
    }
    if let Some(threshold) = args.threshold {
        zpl.threshold = threshold;
    }
    if let Some(dither) = args.dither {
        zpl.dithering = dither;
    }
    if args.graphic_field_only {
        zpl.graphic_field_only = true;
    }
    if args.label_length {
        zpl.set_label_length = true;
    }
    if let Some(quantity) = args.quantity {
        zpl.print_quantity = quantity;
    }
    if let Some(top) = args.label_top {
        zpl.label_top = top;
    }
    if let Some(shift) = args.label_shift {
        zpl.label_shift = shift;
    }

    let raster = &mut config.raster;
    if let Some(dpi) = args.dpi {
        raster.dpi = dpi;
    }
    // Millimetres are converted after --dpi so they use the final resolution
    if let Some(width) = args.width.or(args.width_mm.map(|mm| raster.dots_for_mm(mm))) {
        raster.width = Some(width);
    }
    if let Some(height) = args.height.or(args.height_mm.map(|mm| raster.dots_for_mm(mm))) {
        raster.height = Some(height);
    }
    if args.keep_aspect {
        raster.with_aspect_ratio = true;
    }
    if let Some(rotation) = args.rotate {
        raster.rotation = rotation;
    }
    if let Some(color) = &args.background {
        raster.background = raster::parse_color(color)?.0;
    }

    Ok(config)
}

fn convert_files(args: ConvertArgs) -> Result<(), ZplError> {
    let config = build_config(&args)?;
    let multiple = args.inputs.len() > 1;
    let mut labels = Vec::with_capacity(args.inputs.len());

    for (index, input) in args.inputs.iter().enumerate() {
        info!("converting {}", input.display());
        let image = image::open(input)
            .map_err(|e| ZplError::Image(format!("Failed to open {}: {}", input.display(), e)))?;
        let canvas = prepare::prepare(&image, &config.raster)?;

        if let Some(preview) = &args.preview {
            let path = if multiple {
                numbered_path(preview, index + 1)
            } else {
                preview.clone()
            };
            save_preview(&canvas, &config, &path)?;
        }

        labels.push(convert::convert_bitmap_with_background(
            &canvas,
            &config.zpl,
            config.raster.background_rgba(),
        )?);
    }

    let mut text = labels.join("\n");
    text.push('\n');
    match &args.output {
        Some(path) => {
            std::fs::write(path, text)?;
            eprintln!("Wrote {} label(s) to {}", labels.len(), path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Save the monochrome raster that will be encoded as a PNG.
fn save_preview(
    canvas: &image::RgbaImage,
    config: &ConvertConfig,
    path: &Path,
) -> Result<(), ZplError> {
    let bitmap = convert::reduce(canvas, &config.zpl, config.raster.background_rgba())?;
    bitmap
        .to_gray_image()
        .save(path)
        .map_err(|e| ZplError::Image(format!("Failed to save PNG: {}", e)))?;
    info!("saved preview to {}", path.display());
    Ok(())
}

/// `preview.png` → `preview-2.png`
fn numbered_path(path: &Path, number: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preview".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, number, ext.to_string_lossy()),
        None => format!("{}-{}", stem, number),
    };
    path.with_file_name(name)
}
