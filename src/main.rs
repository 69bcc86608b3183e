use clap::{Parser, Subcommand};
use emoji_manifest::imaging::RustProbe;
use emoji_manifest::pipeline::{self, BuildOptions};
use emoji_manifest::store::ManifestFormat;
use emoji_manifest::{config, output};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "emoji-manifest")]
#[command(about = "Build an emoji set manifest and preview from a directory of images")]
#[command(long_about = "\
Build an emoji set manifest and preview from a directory of images

The directory is the data source. Every image becomes an emoji named after
its file; @2x-style suffixes are grouped as resolution variants.

Directory structure:

  emoji/
  ├── config.toml          # Build config (optional)
  ├── icon.png             # Set icon, ignored
  ├── smile.png            # Emoji 'smile'
  ├── smile@2x.png         # 'smile' at 2x
  ├── heart.svg            # Vector emoji, fixed size
  ├── manifest.json        # Written by build, read back on the next build
  └── preview.html         # Written by build

Edits to the manifest survive rebuilds: rename an emoji in manifest.json and
the new name sticks to its file. Aliases and the editor shortlist are merged
with the built-in defaults on every build.

Run 'emoji-manifest gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan an image directory and write its manifest and preview
    Build {
        /// Directory of emoji images
        path: PathBuf,

        /// Manifest format: json or php (default from config.toml, else json)
        #[arg(short, long)]
        format: Option<ManifestFormat>,

        /// Manifest location (default: manifest.<format> in the image directory)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// JSON file replacing the built-in alias, archive and editor tables
        #[arg(long)]
        defaults: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build {
            path,
            format,
            manifest,
            defaults,
        } => {
            let options = BuildOptions {
                image_dir: path,
                format,
                manifest_path: manifest,
                defaults_path: defaults,
            };
            let report = pipeline::build(&options, &RustProbe::new())?;
            output::print_build_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the build summary.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
