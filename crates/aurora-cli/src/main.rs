//! Aurora CLI - seal, verify and summarize exported artifacts

use anyhow::{bail, Context};
use aurora_guard::{ExportGuard, ExportOptions, ExportPolicy, GuardConfig};
use aurora_symbolic::{
    make_glyphcard, verify_document, DriftProbe, GlyphcardOptions, Manifest, SealedArtifact,
};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aurora")]
#[command(about = "Aurora - artifact sealing, verification and glyphcards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the glyphcard of a sealed artifact
    Glyphcard {
        /// Sealed artifact JSON (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Mark the glyphcard as unredacted
        #[arg(long)]
        no_redact: bool,
        /// Glyphcard title
        #[arg(long)]
        title: Option<String>,
    },
    /// Verify the seal of a sealed artifact (exit 1 when invalid)
    Verify {
        /// Sealed artifact JSON (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Run an artifact through the export guard and print the outcome
    Export {
        /// Artifact JSON (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Manifest JSON file
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// Export policy: off, warn or strict
        #[arg(short, long)]
        policy: Option<ExportPolicy>,
        /// Attach a glyphcard to the outcome
        #[arg(long)]
        glyphcard: bool,
        /// Label recorded in the audit entry
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Score drift observations, one per line
    Drift {
        /// Observation file (reads stdin when omitted)
        file: Option<PathBuf>,
        #[arg(long, default_value = "cli")]
        source: String,
        #[arg(long, default_value = "aurora.drift")]
        anchor: String,
    },
}

#[derive(Serialize)]
struct DriftOutput<'a> {
    #[serde(flatten)]
    probe: &'a DriftProbe,
    score: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    let config = GuardConfig::from_env().context("invalid AURORA_* environment")?;
    debug!(?config, "configuration loaded");

    match command {
        Commands::Glyphcard {
            file,
            no_redact,
            title,
        } => {
            let sealed = read_sealed(file.as_deref())?;
            let options = GlyphcardOptions {
                redact: config.redact && !no_redact,
                title,
            };
            let card = make_glyphcard(&sealed, &options).context("failed to build glyphcard")?;
            print_json(&card)?;
        }
        Commands::Verify { file } => {
            let document = read_json(file.as_deref())?;
            check_sealed_shape(&document)?;
            let valid = verify_document(&document);
            print_json(&serde_json::json!({
                "valid": valid,
                "digest": document["seal"]["digest"],
            }))?;
            if !valid {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Export {
            file,
            manifest,
            policy,
            glyphcard,
            source,
        } => {
            let artifact = read_json(file.as_deref())?;
            let mut options = ExportOptions::new();
            options.policy = policy;
            options.source = source;
            if glyphcard {
                options.glyphcard = Some(true);
            }
            if let Some(path) = manifest {
                let raw = read_input(Some(&path))?;
                let manifest: Manifest = serde_json::from_str(&raw)
                    .with_context(|| format!("malformed manifest in {}", path.display()))?;
                options.manifest = Some(manifest);
            }

            let outcome = ExportGuard::new(config).guard_export(artifact, options)?;
            for warning in &outcome.warnings {
                eprintln!("warning: {}", warning);
            }
            print_json(&outcome)?;
        }
        Commands::Drift {
            file,
            source,
            anchor,
        } => {
            let raw = read_input(file.as_deref())?;
            let mut probe = DriftProbe::new(source, anchor);
            for line in raw.lines().filter(|l| !l.trim().is_empty()) {
                probe.observe(line.trim());
            }
            let score = probe.emit();
            print_json(&DriftOutput {
                probe: &probe,
                score,
            })?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads a file, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read standard input")?;
            Ok(buf)
        }
    }
}

fn read_json(path: Option<&Path>) -> anyhow::Result<Value> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("input is not valid JSON")
}

const SEALED_KEYS: [&str; 3] = ["artifact", "manifest", "seal"];

/// Reads a sealed artifact and checks its top-level shape before decoding.
fn read_sealed(path: Option<&Path>) -> anyhow::Result<SealedArtifact> {
    let value = read_json(path)?;
    check_sealed_shape(&value)?;
    serde_json::from_value(value).context("malformed sealed artifact")
}

fn check_sealed_shape(value: &Value) -> anyhow::Result<()> {
    let Some(object) = value.as_object() else {
        bail!("sealed artifact must be a JSON object");
    };

    let missing: Vec<&str> = SEALED_KEYS
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        bail!("sealed artifact is missing {}", missing.join(", "));
    }

    let unknown: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !SEALED_KEYS.contains(key))
        .collect();
    if !unknown.is_empty() {
        bail!("sealed artifact has unknown keys: {}", unknown.join(", "));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{}", text);
    Ok(())
}
