use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use envmap::{
    AdapterChoice, AddressMode, Codec as _, EnvmapCommand, EnvmapOpts, FormatChoice, ImageFilter,
    PixelFormat, SrgbFlags,
};

#[derive(Parser, Debug)]
#[command(name = "envmap", version)]
struct Cli {
    /// Show debug-level progress.
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a cubic environment map from six faces.
    Cubic(BakeArgs),
    /// Create a sphere environment map.
    Sphere(BakeArgs),
    /// Create a dual parabolic environment map.
    Parabola(BakeArgs),
    /// Create a dual hemisphere environment map.
    Hemisphere(BakeArgs),
    /// List GPU adapters usable with `--gpu`.
    Adapters {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the descriptor of an image file.
    Info {
        path: PathBuf,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true)]
struct BakeArgs {
    /// Source images: 1, or 6 in +X -X +Y -Y +Z -Z order.
    sources: Vec<PathBuf>,

    /// Text file with a list of input files (one per line).
    #[arg(long)]
    flist: Option<PathBuf>,

    /// Face width (0 derives it from the sources).
    #[arg(short = 'w', long, default_value_t = 0)]
    width: u32,

    /// Face height (0 derives it from the sources).
    #[arg(short = 'h', long, default_value_t = 0)]
    height: u32,

    /// Output pixel format, e.g. R16G16B16A16_FLOAT or FP16 (default: from the first source).
    #[arg(short = 'f', long, value_parser = parse_format)]
    format: Option<PixelFormat>,

    /// Image filter used when a source has to be resampled.
    #[arg(long = "if", default_value_t = ImageFilter::Linear)]
    filter: ImageFilter,

    /// Filter alpha separately from colour when resampling.
    #[arg(long)]
    sepalpha: bool,

    /// Treat input as sRGB.
    #[arg(long)]
    srgbi: bool,

    /// Write sRGB output.
    #[arg(long)]
    srgbo: bool,

    /// Both `--srgbi` and `--srgbo`.
    #[arg(long)]
    srgb: bool,

    /// Output file name (default: first source name with `.dds`).
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Force the output file name to lower case.
    #[arg(short = 'l', long)]
    lower: bool,

    /// Overwrite an existing output file.
    #[arg(short = 'y', long)]
    overwrite: bool,

    /// Convert premultiplied alpha to straight alpha.
    #[arg(long)]
    alpha: bool,

    /// Wrap texture addressing.
    #[arg(long, conflicts_with = "mirror")]
    wrap: bool,

    /// Mirror texture addressing.
    #[arg(long)]
    mirror: bool,

    /// Adapter index from `envmap adapters` (default: best available).
    #[arg(long)]
    gpu: Option<usize>,

    /// Print help.
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

fn parse_format(s: &str) -> Result<PixelFormat, String> {
    PixelFormat::parse_target(s).ok_or_else(|| {
        let names: Vec<&str> = envmap::RENDER_TARGET_FORMATS
            .iter()
            .map(|f| f.name())
            .chain(envmap::FORMAT_ALIASES.iter().map(|(alias, _)| *alias))
            .collect();
        format!("invalid format '{s}'; expected one of {}", names.join(", "))
    })
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Cubic(args) => cmd_bake(EnvmapCommand::Cubic, args),
        Command::Sphere(args) => cmd_bake(EnvmapCommand::Sphere, args),
        Command::Parabola(args) => cmd_bake(EnvmapCommand::Parabola, args),
        Command::Hemisphere(args) => cmd_bake(EnvmapCommand::Hemisphere, args),
        Command::Adapters { json } => cmd_adapters(json),
        Command::Info { path, json } => cmd_info(path, json),
    }
}

fn cmd_bake(command: EnvmapCommand, args: BakeArgs) -> anyhow::Result<()> {
    let mut sources = args.sources;
    if let Some(list) = &args.flist {
        sources.extend(envmap::read_file_list(list)?);
    }

    let address_mode = if args.wrap {
        AddressMode::Wrap
    } else if args.mirror {
        AddressMode::Mirror
    } else {
        AddressMode::Clamp
    };

    let opts = EnvmapOpts {
        command,
        width: args.width,
        height: args.height,
        format: args.format.map_or(FormatChoice::Auto, FormatChoice::Fixed),
        filter: args.filter,
        separate_alpha: args.sepalpha,
        srgb: SrgbFlags {
            srgb_in: args.srgbi || args.srgb,
            srgb_out: args.srgbo || args.srgb,
        },
        address_mode,
        demultiply_alpha: args.alpha,
        adapter: args.gpu.map_or(AdapterChoice::Auto, AdapterChoice::Index),
        sources,
        output: args.output,
        overwrite: args.overwrite,
        lowercase_output: args.lower,
    };

    let summary = envmap::run(&opts, &envmap::DdsCodec)?;
    if summary.skipped > 0 {
        eprintln!("skipped {} source(s)", summary.skipped);
    }
    eprintln!("wrote {}", summary.output.display());
    Ok(())
}

fn cmd_adapters(json: bool) -> anyhow::Result<()> {
    let adapters = envmap::list_adapters();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&adapters).context("serialize adapter list")?
        );
        return Ok(());
    }
    if adapters.is_empty() {
        eprintln!("no gpu adapters found");
    }
    for adapter in adapters {
        println!("{adapter}");
    }
    Ok(())
}

fn cmd_info(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let image = envmap::DdsCodec
        .load(&path)
        .with_context(|| format!("read '{}'", path.display()))?;
    if json {
        let value = serde_json::json!({
            "path": path,
            "descriptor": image.desc(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("serialize descriptor")?
        );
    } else {
        println!("{} {}", path.display(), image.desc());
    }
    Ok(())
}
