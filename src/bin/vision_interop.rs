use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vision_interop::{
    ConvertPolicy, Coord2d, DrawStyle, Line2d, Rgb8, SoftwareRuntime, SoftwareRuntimeOpts,
    VisionRuntime,
};

#[derive(Parser, Debug)]
#[command(name = "vision-interop", version)]
struct Cli {
    /// Pad runtime image rows to a multiple of this many bytes.
    #[arg(long, global = true)]
    row_align: Option<usize>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a 16-bit document matrix and write it as an 8-bit image.
    ImportMatrix(ImportMatrixArgs),
    /// Load an image through the runtime and write it back out.
    CopyImage(CopyImageArgs),
    /// Import a remap field and print its sizes as JSON.
    RemapInfo(RemapInfoArgs),
    /// Draw line segments on a copy of an image.
    DrawLines(DrawLinesArgs),
    /// Draw circles on a copy of an image.
    DrawCircles(DrawCirclesArgs),
}

#[derive(Parser, Debug)]
struct ImportMatrixArgs {
    /// Input matrix document (JSON).
    #[arg(long)]
    doc: PathBuf,

    /// Matrix node name.
    #[arg(long)]
    node: String,

    /// Output image path; the extension picks the codec.
    #[arg(long)]
    out: PathBuf,

    /// Right shift applied before narrowing to 8 bits.
    #[arg(long, default_value_t = 0)]
    shift: u32,

    /// Keep the low byte instead of saturating.
    #[arg(long, default_value_t = false)]
    wrap: bool,
}

#[derive(Parser, Debug)]
struct CopyImageArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RemapInfoArgs {
    /// Input matrix document (JSON).
    #[arg(long)]
    doc: PathBuf,

    /// Remap node name.
    #[arg(long)]
    node: String,
}

#[derive(Parser, Debug)]
struct DrawLinesArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Segment as `x0,y0,x1,y1`; repeat for more.
    #[arg(long = "line", value_parser = parse_line, required = true, allow_hyphen_values = true)]
    lines: Vec<Line2d>,

    /// Color as `r,g,b`.
    #[arg(long, value_parser = parse_rgb, default_value = "255,0,0")]
    color: Rgb8,

    #[arg(long, default_value_t = 1)]
    thickness: i32,
}

#[derive(Parser, Debug)]
struct DrawCirclesArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Center as `x,y`; repeat for more.
    #[arg(long = "center", value_parser = parse_coord, required = true, allow_hyphen_values = true)]
    centers: Vec<Coord2d>,

    #[arg(long)]
    radius: u32,

    /// Color as `r,g,b`.
    #[arg(long, value_parser = parse_rgb, default_value = "255,0,0")]
    color: Rgb8,

    /// Outline width; negative fills the circle.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    thickness: i32,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let opts = match cli.row_align {
        Some(row_align) => SoftwareRuntimeOpts { row_align },
        None => SoftwareRuntimeOpts::from_env(),
    };
    let mut runtime = SoftwareRuntime::new(opts);

    match cli.cmd {
        Command::ImportMatrix(args) => cmd_import_matrix(&mut runtime, args),
        Command::CopyImage(args) => cmd_copy_image(&mut runtime, args),
        Command::RemapInfo(args) => cmd_remap_info(&mut runtime, args),
        Command::DrawLines(args) => cmd_draw_lines(&mut runtime, args),
        Command::DrawCircles(args) => cmd_draw_circles(&mut runtime, args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_import_matrix(runtime: &mut SoftwareRuntime, args: ImportMatrixArgs) -> anyhow::Result<()> {
    let imported = vision_interop::import_image_from_document_path(runtime, &args.doc, &args.node)
        .with_context(|| format!("import '{}' from '{}'", args.node, args.doc.display()))?;
    let policy = if args.wrap {
        ConvertPolicy::Wrap
    } else {
        ConvertPolicy::Saturate
    };
    let narrow = vision_interop::convert_depth(runtime, imported.image, policy, args.shift)?;
    vision_interop::export_image_to_file(runtime, narrow, &args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        imported.width,
        imported.height
    );
    Ok(())
}

fn cmd_copy_image(runtime: &mut SoftwareRuntime, args: CopyImageArgs) -> anyhow::Result<()> {
    let image = vision_interop::import_image_from_file(runtime, &args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    vision_interop::export_image_to_file(runtime, image, &args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_remap_info(runtime: &mut SoftwareRuntime, args: RemapInfoArgs) -> anyhow::Result<()> {
    let imported = vision_interop::import_remap_field_from_path(runtime, &args.doc, &args.node)
        .with_context(|| format!("import remap '{}' from '{}'", args.node, args.doc.display()))?;
    let info = runtime
        .query_remap(imported.remap)
        .map_err(|status| anyhow::anyhow!("query_remap failed: {status}"))?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_draw_lines(runtime: &mut SoftwareRuntime, args: DrawLinesArgs) -> anyhow::Result<()> {
    let image = vision_interop::import_image_from_file(runtime, &args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let style = DrawStyle {
        color: args.color,
        thickness: args.thickness,
    };
    let drawn = vision_interop::draw_lines(runtime, image, &args.lines, args.lines.len(), &style)?;
    vision_interop::export_image_to_file(runtime, drawn, &args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_draw_circles(runtime: &mut SoftwareRuntime, args: DrawCirclesArgs) -> anyhow::Result<()> {
    let image = vision_interop::import_image_from_file(runtime, &args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let style = DrawStyle {
        color: args.color,
        thickness: args.thickness,
    };
    let drawn = vision_interop::draw_circles(
        runtime,
        image,
        &args.centers,
        args.centers.len(),
        args.radius,
        &style,
    )?;
    vision_interop::export_image_to_file(runtime, drawn, &args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated values, got '{s}'"));
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not an integer"))?;
    }
    Ok(out)
}

fn parse_line(s: &str) -> Result<Line2d, String> {
    let [x0, y0, x1, y1] = parse_ints::<4>(s)?;
    Ok(Line2d::new(Coord2d::new(x0, y0), Coord2d::new(x1, y1)))
}

fn parse_coord(s: &str) -> Result<Coord2d, String> {
    let [x, y] = parse_ints::<2>(s)?;
    Ok(Coord2d::new(x, y))
}

fn parse_rgb(s: &str) -> Result<Rgb8, String> {
    let channels = parse_ints::<3>(s)?;
    let mut rgb = [0u8; 3];
    for (dst, c) in rgb.iter_mut().zip(channels) {
        *dst = u8::try_from(c).map_err(|_| format!("channel {c} is outside 0..=255"))?;
    }
    Ok(Rgb8::from_array(rgb))
}
