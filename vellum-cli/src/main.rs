//! Vellum CLI: convert an SVG document into drawing calls.
//!
//! Prints the call tree (or JSON with `--json`) to stdout and the conversion
//! warnings to stderr.

use std::fs;

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use vellum_common::net::{DataUrl, fetch_from_url};
use vellum_svg::{ConvertOptions, DEFAULT_MAX_DEPTH, Rendering, convert_str};

/// Vellum: SVG markup to drawing calls
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the call tree of a file
    vellum ./logo.svg

    # Fetch a remote document and print JSON
    vellum --json https://example.com/logo.svg

    # Convert inline markup
    vellum --svg '<svg width="10" height="10"><rect width="5" height="5"/></svg>'

    # Allow references to ids defined later in the document
    vellum --pre-register-ids ./sprites.svg
"#)]
struct Cli {
    /// Path, URL or data: URL of the SVG document
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Convert this markup instead of reading a file
    #[arg(long, value_name = "TEXT", conflicts_with = "path")]
    svg: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Maximum element nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Viewport width when the document gives none
    #[arg(long, default_value = "300")]
    width: f64,

    /// Viewport height when the document gives none
    #[arg(long, default_value = "150")]
    height: f64,

    /// Register all ids before converting, so references may point forward
    #[arg(long)]
    pre_register_ids: bool,

    /// Do not print warnings
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            max_depth: self.max_depth,
            default_width: self.width,
            default_height: self.height,
            pre_register_ids: self.pre_register_ids,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let markup = load_markup(&cli)?;
    let rendering = convert_str(&markup, &cli.options())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendering)?);
    } else {
        print_rendering(&rendering);
    }

    if !cli.quiet {
        for warning in &rendering.warnings {
            eprintln!("{}", format!("warning: {warning}").yellow());
        }
    }
    Ok(())
}

/// Read the document from `--svg`, a data: URL, an http(s) URL or a file.
fn load_markup(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref text) = cli.svg {
        return Ok(text.clone());
    }
    let Some(ref path) = cli.path else {
        bail!("no input given; pass a FILE|URL or --svg TEXT");
    };

    let bytes = if path.starts_with("data:") {
        DataUrl::parse(path)?.decode()?
    } else if let Some(bytes) = fetch_from_url(path)? {
        bytes
    } else {
        fs::read(path).with_context(|| format!("failed to read {path}"))?
    };
    String::from_utf8(bytes).with_context(|| format!("{path} is not UTF-8 text"))
}

fn print_rendering(rendering: &Rendering) {
    println!(
        "{}",
        format!("canvas {}x{}", rendering.width, rendering.height).bold()
    );
    for call in &rendering.calls {
        print!("{call}");
    }
}
