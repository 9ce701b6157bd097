use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use chaosperm::analysis::{sweep, CycleReport, SweepConfig};
use chaosperm::{ChaosKey, ChaoticMap, ImageBuffer, ImageCipher, ImageKey, TextCipher};
use clap::{Args, Parser, Subcommand};
use image::DynamicImage;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// chaosperm - chaotic-map permutations and permutation/diffusion ciphers
#[derive(Parser)]
#[command(name = "chaosperm")]
#[command(version)]
#[command(about = "Chaotic-map permutation ciphers for text and images", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct KeyArgs {
    /// Map as name[:param], e.g. logistic:3.99, chebyshev:3, tent:1.99
    #[arg(short, long, default_value = "logistic")]
    map: ChaoticMap,

    /// Initial value inside the map's domain
    #[arg(short, long, allow_negative_numbers = true)]
    seed: f64,

    /// Discarded burn-in iterations
    #[arg(short, long, default_value_t = chaosperm::DEFAULT_TRANSIENT)]
    transient: usize,
}

impl KeyArgs {
    fn key(&self) -> ChaosKey {
        ChaosKey::new(self.map, self.seed).with_transient(self.transient)
    }
}

#[derive(Args)]
struct ImageKeyArgs {
    /// JSON key file with optional "rows", "columns" and "pixels" entries
    #[arg(short, long, conflicts_with_all = ["rows", "columns", "pixels"])]
    key: Option<PathBuf>,

    /// Row permutation key, <map>@<seed>[/<transient>]
    #[arg(long)]
    rows: Option<ChaosKey>,

    /// Column permutation key, <map>@<seed>[/<transient>]
    #[arg(long)]
    columns: Option<ChaosKey>,

    /// Pixel diffusion key, <map>@<seed>[/<transient>]
    #[arg(long)]
    pixels: Option<ChaosKey>,
}

impl ImageKeyArgs {
    fn load(&self) -> anyhow::Result<ImageKey> {
        let key = match &self.key {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read key file {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("invalid key file {}", path.display()))?
            }
            None => ImageKey {
                rows: self.rows,
                columns: self.columns,
                pixels: self.pixels,
            },
        };
        if key == ImageKey::default() {
            bail!("no cipher stage selected: pass --key or at least one of --rows, --columns, --pixels");
        }
        Ok(key)
    }
}

#[derive(Args)]
struct TextArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Text to transform
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a UTF-8 file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl TextArgs {
    fn input(&self) -> anyhow::Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            (None, None) => Err(anyhow!("please provide either --text or --file")),
        }
    }

    fn emit(&self, result: &str) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => fs::write(path, result)
                .with_context(|| format!("failed to write {}", path.display())),
            None => {
                println!("{result}");
                Ok(())
            }
        }
    }
}

#[derive(Args)]
struct ImageArgs {
    /// Input image (PNG or BMP)
    #[arg(short, long)]
    input: PathBuf,

    /// Output image; must be a lossless format
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    key: ImageKeyArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the permutation generated from a key
    Permute {
        #[command(flatten)]
        key: KeyArgs,

        /// Permutation length
        #[arg(short = 'n', long)]
        size: usize,
    },
    /// Show the cycle structure and order of a generated permutation
    Analyze {
        #[command(flatten)]
        key: KeyArgs,

        /// Permutation length
        #[arg(short = 'n', long)]
        size: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Average permutation order over random seeds for a range of sizes
    Sweep {
        /// Map as name[:param]
        #[arg(short, long, default_value = "logistic")]
        map: ChaoticMap,

        /// JSON sweep configuration; command line values override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        min_size: Option<usize>,

        #[arg(long)]
        max_size: Option<usize>,

        #[arg(long)]
        step: Option<usize>,

        /// Seeds drawn per size
        #[arg(long)]
        seeds: Option<usize>,

        /// RNG seed for drawing map seeds
        #[arg(long)]
        rng_seed: Option<u64>,
    },
    /// Dump keystream bytes as hex
    Keystream {
        #[command(flatten)]
        key: KeyArgs,

        /// Number of bytes
        #[arg(short = 'n', long, default_value_t = 32)]
        len: usize,
    },
    /// Permute the characters of a text
    EncryptText(TextArgs),
    /// Undo EncryptText with the same key
    DecryptText(TextArgs),
    /// Spatial remap and/or pixel diffusion of an image
    EncryptImage(ImageArgs),
    /// Undo EncryptImage with the same key
    DecryptImage(ImageArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Diffusion ciphertext does not survive lossy compression.
fn validate_lossless_format(path: &Path) -> anyhow::Result<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .ok_or_else(|| anyhow!("output file must have an extension (e.g. .png)"))?;
    match ext.as_str() {
        "png" | "bmp" => Ok(()),
        "jpg" | "jpeg" => Err(anyhow!(
            "JPEG is lossy and would destroy the ciphertext; use .png or .bmp"
        )),
        other => Err(anyhow!("unsupported output format .{other}; use .png or .bmp")),
    }
}

/// Grayscale -> 1 channel, colour -> 3, anything with alpha -> 4.
fn load_image(path: &Path) -> anyhow::Result<ImageBuffer> {
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let color = img.color();
    let (channels, samples) = if color.has_alpha() {
        (4, img.into_rgba8().into_raw())
    } else if color.has_color() {
        (3, img.into_rgb8().into_raw())
    } else {
        (1, img.into_luma8().into_raw())
    };
    info!(width, height, channels, "loaded {}", path.display());
    Ok(ImageBuffer::new(height, width, channels, samples)?)
}

fn save_image(image: &ImageBuffer, path: &Path) -> anyhow::Result<()> {
    let width = u32::try_from(image.width())?;
    let height = u32::try_from(image.height())?;
    let raw = image.as_bytes().to_vec();
    let dynamic = match image.channels() {
        1 => image::GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
        n => bail!("cannot save an image with {n} channels"),
    }
    .ok_or_else(|| anyhow!("sample buffer does not match {width}x{height}"))?;
    dynamic
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("saved {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Permute { key, size } => {
            let perm = key.key().permutation(size)?;
            println!("{perm}");
        }

        Commands::Analyze { key, size, json } => {
            let report = CycleReport::new(&key.key(), size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }

        Commands::Sweep {
            map,
            config,
            min_size,
            max_size,
            step,
            seeds,
            rng_seed,
        } => {
            let mut cfg = match config {
                Some(path) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    serde_json::from_str::<SweepConfig>(&json)
                        .with_context(|| format!("invalid sweep config {}", path.display()))?
                }
                None => SweepConfig::default(),
            };
            cfg.min_size = min_size.unwrap_or(cfg.min_size);
            cfg.max_size = max_size.unwrap_or(cfg.max_size);
            cfg.step = step.unwrap_or(cfg.step);
            cfg.seeds_per_size = seeds.unwrap_or(cfg.seeds_per_size);
            cfg.rng_seed = rng_seed.unwrap_or(cfg.rng_seed);
            info!(%map, ?cfg, "starting order sweep");
            for point in sweep(map, &cfg)? {
                println!("{}", serde_json::to_string(&point)?);
            }
        }

        Commands::Keystream { key, len } => {
            println!("{}", hex::encode(key.key().keystream(len)?));
        }

        Commands::EncryptText(args) => {
            let result = TextCipher::new(args.key.key()).encrypt(&args.input()?)?;
            args.emit(&result)?;
        }

        Commands::DecryptText(args) => {
            let result = TextCipher::new(args.key.key()).decrypt(&args.input()?)?;
            args.emit(&result)?;
        }

        Commands::EncryptImage(args) => {
            validate_lossless_format(&args.output)?;
            let cipher = ImageCipher::new(args.key.load()?);
            let encrypted = cipher.encrypt(&load_image(&args.input)?)?;
            save_image(&encrypted, &args.output)?;
        }

        Commands::DecryptImage(args) => {
            validate_lossless_format(&args.output)?;
            let cipher = ImageCipher::new(args.key.load()?);
            let decrypted = cipher.decrypt(&load_image(&args.input)?)?;
            save_image(&decrypted, &args.output)?;
        }
    }

    Ok(())
}
