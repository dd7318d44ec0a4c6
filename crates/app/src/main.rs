//! Entry point for matconv.
//! Converts `.kmat`, IQM and Wavefront `.mtl` material sources into the
//! renderer's JSON5 material format.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use asset::{
    SourceFormat, emit,
    iqm::{self, IqmOptions},
    kmat, mtl,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "matconv", version, about = "Convert material sources to JSON5")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert one legacy .kmat material.
    Kmat {
        file: PathBuf,

        /// Print to standard output instead of writing <stem>.json5.
        #[arg(long)]
        stdout: bool,
    },

    /// Emit the materials referenced by IQM models.
    Iqm {
        /// .iqm files, or directories to scan for them.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Convert <material>.kmat files found next to each model.
        #[arg(long)]
        kmat: bool,

        /// Print to standard output instead of writing <stem>.json5.
        #[arg(long)]
        stdout: bool,
    },

    /// Convert a Wavefront .mtl file.
    Mtl {
        file: PathBuf,

        /// Document name.
        name: String,

        /// Document file label, usually the model path.
        label: String,

        /// Write here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

fn write_output(text: &str, target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Expand directories into the `.iqm` files they contain.
fn iqm_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = iqm::find_iqm_files(path)?;
            if found.is_empty() {
                log::warn!("No .iqm files in {}", path.display());
            }
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Kmat { file, stdout } => {
            let material = kmat::load_kmat_from_path(&file)?;
            let text = emit::render_material(&material, SourceFormat::Legacy);
            let target = (!stdout).then(|| emit::json5_path_for(&file));
            write_output(&text, target.as_deref())?;
        }
        Command::Iqm {
            paths,
            kmat,
            stdout,
        } => {
            let options = IqmOptions { resolve_kmat: kmat };
            for path in iqm_inputs(&paths)? {
                let document = iqm::load_iqm_document(&path, options)?;
                let text = emit::render_document(&document, SourceFormat::Legacy);
                let target = (!stdout).then(|| emit::json5_path_for(&path));
                write_output(&text, target.as_deref())?;
            }
        }
        Command::Mtl {
            file,
            name,
            label,
            output,
        } => {
            let document = mtl::load_mtl_document(&file, name, label)?;
            let text = emit::render_document(&document, SourceFormat::Wavefront);
            write_output(&text, output.as_deref())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    run(cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mtl_takes_name_and_label() {
        let cli = Cli::try_parse_from(["matconv", "mtl", "a.mtl", "sponza", "./sponza.obj"])
            .expect("parse");
        match cli.command {
            Command::Mtl {
                file,
                name,
                label,
                output,
            } => {
                assert_eq!(file, PathBuf::from("a.mtl"));
                assert_eq!(name, "sponza");
                assert_eq!(label, "./sponza.obj");
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn iqm_requires_a_path() {
        assert!(Cli::try_parse_from(["matconv", "iqm"]).is_err());
    }

    #[test]
    fn verbosity_selects_filter() {
        let cli = Cli::try_parse_from(["matconv", "-v", "kmat", "a.kmat"]).expect("parse");
        assert_eq!(cli.log_filter(), "debug");
        let cli = Cli::try_parse_from(["matconv", "kmat", "a.kmat", "-q"]).expect("parse");
        assert_eq!(cli.log_filter(), "warn");
        assert!(Cli::try_parse_from(["matconv", "-v", "-q", "kmat", "a.kmat"]).is_err());
    }

    #[test]
    fn directories_expand_to_iqm_files() {
        let dir = std::env::temp_dir().join(format!("matconv-app-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("queen.iqm"), b"").unwrap();
        let single = PathBuf::from("bishop.iqm");
        let inputs = iqm_inputs(&[dir.clone(), single.clone()]).unwrap();
        assert_eq!(inputs, vec![dir.join("queen.iqm"), single]);
        fs::remove_dir_all(&dir).ok();
    }
}
