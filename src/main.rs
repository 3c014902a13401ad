use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use certrender::present::{self, OutputFormat};
use certrender::{Renderer, RendererConfig, Variant};

#[derive(Parser)]
#[command(name = "certrender", version, about = "Render completion certificates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the certificate HTTP API
    #[cfg(feature = "server")]
    Serve(ServeArgs),
    /// Render one certificate from a JSON record
    Render(RenderArgs),
}

#[derive(Args)]
struct FontArgs {
    /// Font family list used for all text
    #[arg(long)]
    font_family: Option<String>,
    /// Extra directory to load fonts from (repeatable)
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
    /// Do not load fonts installed on the host
    #[arg(long)]
    no_system_fonts: bool,
}

impl FontArgs {
    fn renderer_config(&self) -> RendererConfig {
        let mut cfg = RendererConfig::default();
        if let Some(family) = &self.font_family {
            cfg.font_family = family.clone();
        }
        cfg.font_dirs = self.font_dirs.clone();
        cfg.load_system_fonts = !self.no_system_fonts;
        cfg
    }
}

#[cfg(feature = "server")]
#[derive(Args)]
struct ServeArgs {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: String,
    /// Bearer token required on every request
    #[arg(long, env = "CERTIFICATE_API_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,
    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = 100 * 1024)]
    max_body_bytes: usize,
    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Assessment,
    Course,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Assessment => Variant::Assessment,
            VariantArg::Course => Variant::Course,
        }
    }
}

#[derive(Args)]
struct RenderArgs {
    /// Certificate variant
    #[arg(long, value_enum)]
    variant: VariantArg,
    /// JSON record, or `-` for stdin
    #[arg(long, short)]
    input: PathBuf,
    /// Output file
    #[arg(long, short)]
    output: PathBuf,
    /// Write an HTML page embedding the image instead of a PNG
    #[arg(long)]
    html: bool,
    #[command(flatten)]
    fonts: FontArgs,
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let body = if args.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading record from stdin")?;
        buf
    } else {
        std::fs::read(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?
    };

    let request = Variant::from(args.variant).parse(&body)?;
    let renderer = Renderer::new(&args.fonts.renderer_config())?;
    let certificate = renderer.render(&request)?;

    let format = if args.html { OutputFormat::Html } else { OutputFormat::Png };
    let bytes = match format {
        OutputFormat::Png => certificate.png_data.clone(),
        OutputFormat::Html => present::html_page(&request, &certificate).into_bytes(),
    };
    std::fs::write(&args.output, bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "Wrote {} ({}, sha256 {})",
        args.output.display(),
        request.variant(),
        certificate.digest()
    );
    Ok(())
}

#[cfg(feature = "server")]
fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = certrender::ServerConfig {
        addr: args.addr,
        token: args.token,
        max_body_bytes: args.max_body_bytes,
        renderer: args.fonts.renderer_config(),
        ..Default::default()
    };
    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be at least 1");
        }
        config.workers = workers;
    }

    let server = certrender::server::CertificateServer::bind(&config)
        .context("starting certificate API")?;
    server.run();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        #[cfg(feature = "server")]
        Command::Serve(args) => run_serve(args),
        Command::Render(args) => run_render(args),
    }
}
