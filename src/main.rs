use clap::{Parser, Subcommand};
use freerct_site::widgets::navbar::{active_link_ids, compute_layout};
use freerct_site::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "freerct-site")]
#[command(about = "Static site generator for the FreeRCT homepage")]
#[command(long_about = "\
Static site generator for the FreeRCT homepage

Pages, navigation, slides, screenshots and news are declared in
content.toml; site settings live in config.toml next to it.

Content structure:

  content/
  ├── config.toml        # Site config (optional, see gen-config)
  ├── content.toml       # Navigation, pages, slides, screenshots, news
  └── assets/            # Copied to the output root
      ├── images/        # Logo, slides, screenshots, menu icons
      └── pkg/           # wasm-pack output driving the widgets

Run 'freerct-site gen-config' to generate a documented config.toml.
Set RUST_LOG=debug for detailed logs.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page and copy assets
    Build,
    /// Validate config and content without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Show the menu bar geometry for a viewport
    Layout {
        /// Viewport width in CSS pixels
        #[arg(long)]
        width: f64,
        /// Vertical scroll offset in CSS pixels
        #[arg(long, default_value_t = 0.0)]
        scroll: f64,
    },
    /// Show which menu links are active for a page URL
    Active {
        /// Page URL, e.g. https://freerct.github.io/FreeRCT/news.html
        #[arg(long)]
        url: String,
    },
}

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Build => {
            println!("==> Building {} \u{2192} {}", cli.source.display(), cli.output.display());
            let summary = generate::build(&cli.source, &cli.output)?;
            output::print_build_output(&summary, &cli.output);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (site_config, content) = generate::load_site(&cli.source)?;
            output::print_check_output(&site_config, &content);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Layout { width, scroll } => {
            let site_config = config::load_config(&cli.source)?;
            let params = &site_config.navbar;
            let layout = compute_layout(width, scroll, params);
            let travel = params.bands.spec(layout.band).travel;
            output::print_layout(width, scroll, &layout, travel);
        }
        Command::Active { url } => {
            let (site_config, content) = generate::load_site(&cli.source)?;
            let active = active_link_ids(&url, &content.nav, &site_config.active_rules());
            output::print_active(&url, &content.nav, &active);
        }
    }

    Ok(())
}
