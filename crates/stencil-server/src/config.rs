//! Server configuration
//!
//! Built once at startup from command line arguments (with environment
//! fallbacks) and shared read-only with every handler.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, header};
use clap::Args;
use stencil_core::RenderLimits;
use stencil_core::constants::{DEFAULT_MAX_CANVAS_PIXELS, DEFAULT_MAX_PAGES};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Default upload ceiling (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "STENCIL_BIND", default_value = "0.0.0.0:5174")]
    pub bind: SocketAddr,

    /// Browser origins allowed to call the API (comma separated)
    #[arg(
        long,
        env = "STENCIL_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Largest mural (width × height pixels) a request may allocate
    #[arg(long, env = "STENCIL_MAX_CANVAS_PIXELS", default_value_t = DEFAULT_MAX_CANVAS_PIXELS)]
    pub max_canvas_pixels: u64,

    /// Largest page grid a request may produce
    #[arg(long, env = "STENCIL_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "STENCIL_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Reject unknown filter names instead of falling back to no filter
    #[arg(long, env = "STENCIL_STRICT_FILTERS")]
    pub strict_filters: bool,
}

/// Immutable server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub allowed_origins: Vec<HeaderValue>,
    pub limits: RenderLimits,
    pub max_upload_bytes: usize,
    pub strict_filters: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5174)),
            allowed_origins: vec![HeaderValue::from_static("http://localhost:5173")],
            limits: RenderLimits::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            strict_filters: false,
        }
    }
}

impl ServerConfig {
    /// Validate arguments and build the configuration
    pub fn from_args(args: ServerArgs) -> Result<Self> {
        if args.max_canvas_pixels == 0 {
            bail!("--max-canvas-pixels must be greater than 0");
        }
        if args.max_pages == 0 {
            bail!("--max-pages must be greater than 0");
        }
        if args.max_upload_bytes == 0 {
            bail!("--max-upload-bytes must be greater than 0");
        }

        let allowed_origins = args
            .allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin '{}'", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bind: args.bind,
            allowed_origins,
            limits: RenderLimits {
                max_canvas_pixels: args.max_canvas_pixels,
                max_pages: args.max_pages,
            },
            max_upload_bytes: args.max_upload_bytes,
            strict_filters: args.strict_filters,
        })
    }

    /// CORS policy for the configured origins
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed_origins.clone()))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
            .expose_headers([header::CONTENT_DISPOSITION])
    }
}
