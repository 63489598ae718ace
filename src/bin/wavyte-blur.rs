use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wavyte_blur::{
    BlurOpts, BlurRenderer, BlurRequest, CpuRenderer, DomainMode, IRect, PixelConfig,
    Rgba8Premul, SizeFit, gaussian_blur, plan_blur,
};

#[derive(Parser, Debug)]
#[command(name = "wavyte-blur", version)]
/// Gaussian-blur a PNG with the CPU reference renderer.
struct Cli {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Sigma for both axes.
    #[arg(long, conflicts_with_all = ["sigma_x", "sigma_y"])]
    sigma: Option<f32>,

    /// Horizontal sigma.
    #[arg(long)]
    sigma_x: Option<f32>,

    /// Vertical sigma.
    #[arg(long)]
    sigma_y: Option<f32>,

    /// Edge handling outside the image.
    #[arg(long, value_enum, default_value_t = ModeChoice::Clamp)]
    mode: ModeChoice,

    /// Grow the output by this many pixels on each side.
    #[arg(long, default_value_t = 0)]
    pad: u32,

    /// Backing-store policy for the output surface.
    #[arg(long, value_enum, default_value_t = FitChoice::Exact)]
    fit: FitChoice,

    /// Largest 2-D kernel drawn in one pass (overrides WAVYTE_BLUR_MAX_FUSED_TAPS).
    #[arg(long)]
    max_fused_taps: Option<usize>,

    /// Print the blur plan as JSON to stdout.
    #[arg(long)]
    dump_plan: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Ignore,
    Clamp,
    Repeat,
    Decal,
}

impl From<ModeChoice> for DomainMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Ignore => DomainMode::Ignore,
            ModeChoice::Clamp => DomainMode::Clamp,
            ModeChoice::Repeat => DomainMode::Repeat,
            ModeChoice::Decal => DomainMode::Decal,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitChoice {
    Exact,
    Approx,
}

impl From<FitChoice> for SizeFit {
    fn from(f: FitChoice) -> Self {
        match f {
            FitChoice::Exact => SizeFit::Exact,
            FitChoice::Approx => SizeFit::Approx,
        }
    }
}

impl Cli {
    fn sigmas(&self) -> anyhow::Result<(f32, f32)> {
        if let Some(s) = self.sigma {
            return Ok((s, s));
        }
        if self.sigma_x.is_none() && self.sigma_y.is_none() {
            anyhow::bail!("pass --sigma or --sigma-x/--sigma-y");
        }
        Ok((self.sigma_x.unwrap_or(0.0), self.sigma_y.unwrap_or(0.0)))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd_blur(cli)
}

fn cmd_blur(cli: Cli) -> anyhow::Result<()> {
    let (sigma_x, sigma_y) = cli.sigmas()?;

    let img = image::open(&cli.in_path)
        .with_context(|| format!("read png '{}'", cli.in_path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let mut premul = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        premul.extend_from_slice(&Rgba8Premul::from_straight_rgba(r, g, b, a).to_array());
    }

    let mut renderer = CpuRenderer::default();
    let texture = renderer.upload_rgba8_premul(width, height, premul)?;

    let content = IRect::from_wh(width as i32, height as i32);
    let pad = i32::try_from(cli.pad).context("pad out of range")?;
    let request = BlurRequest::new(
        texture,
        PixelConfig::Rgba8888,
        content,
        content.inset(-pad, -pad),
        sigma_x,
    )
    .with_sigmas(sigma_x, sigma_y)
    .with_mode(cli.mode.into())
    .with_fit(cli.fit.into());

    let opts = match cli.max_fused_taps {
        Some(n) => BlurOpts::from_env().with_max_fused_taps(n),
        None => BlurOpts::from_env(),
    };

    if cli.dump_plan {
        let plan = plan_blur(&request, renderer.caps(), &opts)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    let out = gaussian_blur(&mut renderer, request, &opts)?;
    let frame = renderer.read_rgba8_premul(&out.target)?;
    let straight: Vec<u8> = frame
        .data
        .chunks_exact(4)
        .flat_map(|p| Rgba8Premul::new(p[0], p[1], p[2], p[3]).to_straight_rgba())
        .collect();

    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &cli.out,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        cli.out.display(),
        frame.width,
        frame.height
    );
    Ok(())
}
