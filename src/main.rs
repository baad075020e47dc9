//! `nanoc` - compile a nanoscript game to one JavaScript program
//!
//! ```text
//! nanoc path/to/game.json > game.js
//! nanoc --flip-y --yield-interval 1024 path/to/game.json
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use nanoscript::{CompileOptions, Compiler, DirectorySource, Error, GameManifest};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "nanoc",
    version,
    about = "Compile a nanoscript game to generator-based JavaScript"
)]
struct Cli {
    /// Game manifest; sources are resolved next to it
    manifest: PathBuf,
    /// Flip the y axis so it points up, as if the manifest set `flipY`
    #[arg(long)]
    flip_y: bool,
    /// Loop iterations between frame suspensions
    #[arg(long, default_value_t = 8192)]
    yield_interval: u32,
    /// Leave `/*@"file":line*/` markers out of the program
    #[arg(long)]
    no_origin_markers: bool,
}

impl Cli {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            flip_y: self.flip_y,
            yield_interval: self.yield_interval,
            origin_markers: !self.no_origin_markers,
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let manifest_path = cli.manifest.as_path();
    if !manifest_path.is_file() {
        bail!("{} is not a file", manifest_path.display());
    }
    let text = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest = GameManifest::from_json(&text)
        .with_context(|| format!("Failed to load {}", manifest_path.display()))?;

    let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let sources = DirectorySource::new(root);

    let mut compiler = Compiler::new(cli.options());
    Ok(compiler.compile_program(&manifest, &sources)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(program) => {
            println!("{}", program);
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Compile failures already read `file:line: message`
            match err.downcast_ref::<Error>() {
                Some(compile_error @ Error::SourceError { .. }) => eprintln!("{}", compile_error),
                _ => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
