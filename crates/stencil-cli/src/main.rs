use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use stencil_core::constants::{DEFAULT_MAX_CANVAS_PIXELS, DEFAULT_MAX_PAGES};
use stencil_core::{
    MarginSpec, RenderLimits, RenderProfile, StencilOptions, StencilStatistics, height_for_aspect,
};

#[derive(Parser)]
#[command(name = "stencil", about = "Turn an image into a printable multi-page stencil", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the printable PDF (300 DPI, one A4 page per tile)
    Generate {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (default: stencil_<timestamp>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        stencil: StencilArgs,
    },

    /// Render the gridded preview JPEG (150 DPI)
    Preview {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output JPEG file (default: <input>_preview.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        stencil: StencilArgs,
    },

    /// Show the page grid without rendering
    Plan {
        /// Input image, used to derive the height from its aspect ratio
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Resolution to plan for
        #[arg(long, default_value = "final", value_enum)]
        profile: ProfileArg,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        stencil: StencilArgs,
    },
}

#[derive(Args)]
struct StencilArgs {
    /// Load options from a JSON file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target width in cm
    #[arg(long)]
    width: Option<f64>,

    /// Target height in cm (default: keep the image's aspect ratio)
    #[arg(long)]
    height: Option<f64>,

    /// Image filter
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Margin in cm on every side
    #[arg(long)]
    margin: Option<f64>,

    /// Left and right margin in cm
    #[arg(long)]
    margin_x: Option<f64>,

    /// Top and bottom margin in cm
    #[arg(long)]
    margin_y: Option<f64>,

    /// Largest mural (width × height pixels) to allocate
    #[arg(long, default_value_t = DEFAULT_MAX_CANVAS_PIXELS)]
    max_canvas_pixels: u64,

    /// Largest page grid to produce
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    None,
    Grayscale,
    Outline,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Final,
    Preview,
}

impl From<FilterArg> for stencil_core::FilterKind {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::None => Self::None,
            FilterArg::Grayscale => Self::Grayscale,
            FilterArg::Outline => Self::Outline,
        }
    }
}

impl From<OrientationArg> for stencil_core::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<ProfileArg> for RenderProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Final => RenderProfile::FINAL,
            ProfileArg::Preview => RenderProfile::PREVIEW,
        }
    }
}

impl StencilArgs {
    fn limits(&self) -> RenderLimits {
        RenderLimits {
            max_canvas_pixels: self.max_canvas_pixels,
            max_pages: self.max_pages,
        }
    }

    /// Build the options from `--config` and the flags
    async fn options(&self, image_size: Option<(u32, u32)>) -> Result<StencilOptions> {
        let base = match &self.config {
            Some(path) => Some(
                StencilOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
            ),
            None => None,
        };
        self.apply(base, image_size)
    }

    /// Flags override the config file; a missing height follows the image
    fn apply(
        &self,
        base: Option<StencilOptions>,
        image_size: Option<(u32, u32)>,
    ) -> Result<StencilOptions> {
        let from_config = base.is_some();
        let mut options = base.unwrap_or_default();

        match self.width {
            Some(width) => options.target_width_cm = width,
            None if !from_config => bail!("--width is required without --config"),
            None => {}
        }
        match (self.height, image_size) {
            (Some(height), _) => options.target_height_cm = height,
            (None, _) if from_config => {}
            (None, Some(size)) => {
                options.target_height_cm = height_for_aspect(options.target_width_cm, size)
            }
            (None, None) => bail!("--height is required when no image is given"),
        }

        if let Some(filter) = self.filter {
            options.filter = filter.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }

        if self.margin.is_some() || self.margin_x.is_some() || self.margin_y.is_some() {
            let uniform = self.margin.unwrap_or(0.0);
            let current = options.margins.unwrap_or(MarginSpec::uniform(uniform));
            options.margins = Some(MarginSpec::new(
                self.margin_x.or(self.margin).unwrap_or(current.x_cm),
                self.margin_y.or(self.margin).unwrap_or(current.y_cm),
            ));
        }

        options.validate()?;
        Ok(options)
    }
}

/// Read an image and name its content type from the file signature
async fn read_image(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
        .to_string();
    Ok((bytes, content_type))
}

fn print_statistics(stats: &StencilStatistics) {
    println!("Stencil Statistics:");
    println!(
        "  Target: {} × {} cm",
        stats.target_cm.0, stats.target_cm.1
    );
    println!("  Page: {} × {} cm", stats.page_cm.0, stats.page_cm.1);
    println!(
        "  Grid: {} cols × {} rows ({} pages)",
        stats.cols, stats.rows, stats.pages
    );
    println!(
        "  Mural: {} × {} px at {} DPI",
        stats.canvas_px.0, stats.canvas_px.1, stats.dpi
    );
    println!("  Page pixels: {} × {}", stats.page_px.0, stats.page_px.1);
    println!(
        "  Blank overhang: {:.1} × {:.1} cm",
        stats.overhang_cm.0, stats.overhang_cm.1
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            stencil,
        } => {
            let (bytes, content_type) = read_image(&input).await?;
            let size = stencil_core::image_dimensions(&bytes, &content_type)?;
            let options = stencil.options(Some(size)).await?;

            let rendered =
                stencil_core::generate_pdf(bytes, content_type, options, stencil.limits()).await?;
            print_statistics(&rendered.stats);

            let output = output.unwrap_or_else(|| PathBuf::from(&rendered.filename));
            tokio::fs::write(&output, &rendered.bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Generated {} page stencil → {}",
                rendered.stats.pages,
                output.display()
            );
        }

        Commands::Preview {
            input,
            output,
            stencil,
        } => {
            let (bytes, content_type) = read_image(&input).await?;
            let size = stencil_core::image_dimensions(&bytes, &content_type)?;
            let options = stencil.options(Some(size)).await?;

            let jpeg =
                stencil_core::generate_preview(bytes, content_type, options, stencil.limits())
                    .await?;

            let output = output.unwrap_or_else(|| {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "stencil".to_string());
                input.with_file_name(format!("{}_preview.jpg", stem))
            });
            tokio::fs::write(&output, &jpeg)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Preview → {}", output.display());
        }

        Commands::Plan {
            input,
            profile,
            json,
            stencil,
        } => {
            let size = match &input {
                Some(path) => {
                    let (bytes, content_type) = read_image(path).await?;
                    Some(stencil_core::image_dimensions(&bytes, &content_type)?)
                }
                None => None,
            };
            let options = stencil.options(size).await?;

            let profile: RenderProfile = profile.into();
            let plan = stencil_core::plan_layout(&options, profile.dpi, &stencil.limits())?;
            let stats = stencil_core::summarize(&plan);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_statistics(&stats);
                if let Some(margins) = plan.margins {
                    println!(
                        "  Content: {} × {} px at ({}, {}){}",
                        margins.inner_px.0,
                        margins.inner_px.1,
                        margins.offset_px.0,
                        margins.offset_px.1,
                        if margins.inner_clamped { " (clamped)" } else { "" }
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::{FilterKind, Orientation};

    fn args(argv: &[&str]) -> StencilArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            stencil: StencilArgs,
        }
        let mut full = vec!["stencil"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().stencil
    }

    #[test]
    fn test_flags_build_options() {
        let options = args(&[
            "--width",
            "50",
            "--height",
            "40",
            "--filter",
            "outline",
            "--orientation",
            "landscape",
            "--margin",
            "2",
            "--margin-y",
            "1",
        ])
        .apply(None, None)
        .unwrap();

        assert_eq!(options.target_width_cm, 50.0);
        assert_eq!(options.target_height_cm, 40.0);
        assert_eq!(options.filter, FilterKind::Outline);
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.margins, Some(MarginSpec::new(2.0, 1.0)));
    }

    #[test]
    fn test_height_follows_image() {
        let options = args(&["--width", "30"]).apply(None, Some((300, 200))).unwrap();
        assert!((options.target_height_cm - 20.0).abs() < 1e-9);
        assert!(options.margins.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let base = StencilOptions {
            target_width_cm: 84.0,
            target_height_cm: 59.4,
            filter: FilterKind::Grayscale,
            margins: Some(MarginSpec::new(3.0, 4.0)),
            ..Default::default()
        };
        let options = args(&["--margin-x", "1"])
            .apply(Some(base), Some((10, 10)))
            .unwrap();

        // Config height wins over the image aspect ratio
        assert_eq!(options.target_width_cm, 84.0);
        assert_eq!(options.target_height_cm, 59.4);
        assert_eq!(options.filter, FilterKind::Grayscale);
        assert_eq!(options.margins, Some(MarginSpec::new(1.0, 4.0)));
    }

    #[test]
    fn test_missing_size_is_an_error() {
        assert!(args(&[]).apply(None, Some((10, 10))).is_err());
        assert!(args(&["--width", "10"]).apply(None, None).is_err());
        assert!(args(&["--width=-1", "--height", "5"]).apply(None, None).is_err());
    }
}
