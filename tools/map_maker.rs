//! map_maker.rs - convert a text map into the binary `.dat` format.
//!
//! USAGE:
//! ```bash
//! cargo run --bin map_maker -- \
//!     --input maps/level.txt \
//!     --output maps/level.dat
//! ```
//! Pass `--demo` instead of `--input` to write the built-in level.

use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use clap::Parser;

use wolfcast::map::MapFile;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Text map to read
    #[arg(long, value_name = "FILE", conflicts_with = "demo")]
    input: Option<PathBuf>,

    /// Write the built-in demo level instead of parsing a file
    #[arg(long)]
    demo: bool,

    /// Binary map to write
    #[arg(long, value_name = "FILE", default_value = "map.dat")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let map = match (&opts.input, opts.demo) {
        (Some(path), _) => {
            log::info!("parsing {}", path.display());
            let src = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MapFile::from_text(&src).with_context(|| format!("parsing {}", path.display()))?
        }
        (None, true) => MapFile::demo(),
        (None, false) => bail!("nothing to do: pass --input FILE or --demo"),
    };

    // reject maps the viewer would refuse to load
    map.clone().into_parts()?;
    log::info!(
        "{}x{} tiles, {} objects",
        map.width,
        map.height,
        map.objects.len()
    );

    map.save(&opts.output)
        .with_context(|| format!("writing {}", opts.output.display()))?;
    log::info!("wrote {}", opts.output.display());
    Ok(())
}
