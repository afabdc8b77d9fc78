use carousel::imaging::RustBackend;
use carousel::render::HtmlRenderer;
use carousel::staleness::{AlwaysStale, MtimeOracle, StalenessOracle};
use carousel::{build, config, output};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(about = "Incremental photo gallery builder")]
#[command(long_about = "\
Incremental photo gallery builder

Mirrors a tree of photo directories into a static gallery. Only artifacts
older than their source are rebuilt, so re-running after a change is cheap
and an interrupted build is finished by running it again.

Source structure:

  photos/
  ├── config.toml            # Optional gallery config
  ├── .preview.jpeg          # Optional thumbnail for this directory
  ├── 2020/
  │   ├── 01_Paris/          # '01_' ordering prefix, published as Paris/
  │   │   ├── a.jpeg         # → Paris/a/{a,a_preview,a_view}.jpeg + index.html
  │   │   └── 07.jpeg        # numbered frame → Paris/07/Paris_2020_07.jpeg
  │   └── _drafts/           # built, but not listed on the 2020 page
  └── .cache/                # dot-directories are ignored

Output lines are marked '*' when written and left blank when already current.")]
#[command(version = env!("CAROUSEL_VERSION"))]
struct Cli {
    /// Source directory of photos
    source: PathBuf,

    /// Output directory for the published gallery
    target: PathBuf,

    /// Config file to use instead of <SOURCE>/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore existing output and rebuild every artifact
    #[arg(long)]
    force: bool,

    /// Only print artifacts written in this run
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.source)?,
    };

    let oracle: Box<dyn StalenessOracle> = if cli.force {
        Box::new(AlwaysStale::new(config.staleness.directories))
    } else {
        Box::new(MtimeOracle::new(config.staleness.directories))
    };

    println!(
        "==> Building {} → {}",
        cli.source.display(),
        cli.target.display()
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let target_root = cli.target.clone();
    let quiet = cli.quiet;
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_build_event(&event, &target_root, quiet);
        }
    });

    let result = build::build(
        &cli.source,
        &cli.target,
        &config,
        &RustBackend::new(),
        &HtmlRenderer,
        oracle.as_ref(),
        Some(tx),
    );
    if printer.join().is_err() {
        return Err("progress printer panicked".into());
    }
    let report = result?;

    println!("==> Build complete: {}", report.stats);
    Ok(())
}
