//! # Ravel CLI
//!
//! One-shot façade estimates from the command line (`ravel estimate`), the
//! interactive six-stage wizard (`ravel wizard`) and a view of the active rate
//! table (`ravel rates`).
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).

mod cli;
mod http;
mod interactive;
mod prompt;
mod render;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use estimate_core::calculations::geometry::GeometryInput;
use estimate_core::file_io::{save_report, write_atomic, EstimateReport, FileOutbox};
use estimate_core::materials::SupportMaterial;
use estimate_core::options::OptionsBag;
use estimate_core::pdf::render_estimate_pdf;
use estimate_core::services::{FallbackImagery, NoContext};
use estimate_core::session::FacadeCondition;
use estimate_core::{canonical_rates, derive_geometry, price, EstimateError, RateTable, Wizard};

use cli::{Cli, Commands, EstimateArgs, WizardArgs};
use http::{BanAddressResolver, OverpassContextProvider, StreetViewImagery};
use interactive::Collaborators;
use prompt::Prompter;

/// Address candidates offered per search
const SEARCH_LIMIT: u32 = 5;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            CliError::Estimate(e) => e.error_code(),
            CliError::Io(_) => "IO_ERROR",
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                let body = serde_json::json!({ "error": e.code(), "message": e.to_string() });
                eprintln!("{}", body);
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let rates = match &cli.rates {
        Some(path) => {
            let table = RateTable::load(path)?;
            info!(path = %path.display(), version = %table.version, "Loaded rate table");
            Arc::new(table)
        }
        None => canonical_rates(),
    };

    match cli.command {
        Commands::Estimate(args) => estimate(&args, &rates, cli.json),
        Commands::Rates => show_rates(&rates, cli.json),
        Commands::Wizard(args) => wizard(&args, rates),
    }
}

fn estimate(args: &EstimateArgs, rates: &RateTable, json: bool) -> Result<(), CliError> {
    let dimensions = GeometryInput {
        kind: args.kind.into(),
        level_count: args.levels,
        level_height_m: args.level_height,
        street_width_m: args.street_width,
        rear_width_m: args.rear_width,
        depth_m: args.depth,
        treat_side_wall: args.side_wall,
        zones: args.zones.into(),
        width_floor_m: args.width_floor,
    };
    dimensions.validate()?;

    let facade = FacadeCondition {
        support: SupportMaterial::from_str_flexible(&args.support)?,
        condition: args.condition.into(),
    };
    let options = match &args.options {
        Some(path) => read_options(path)?,
        None => OptionsBag::default(),
    };

    let geometry = derive_geometry(&dimensions);
    let result = price(&geometry, facade.support, facade.condition, &options, rates)?;
    let report = EstimateReport::new(None, dimensions, geometry, facade, options, result);

    if let Some(path) = &args.output {
        save_report(&report, path)?;
        info!(path = %path.display(), "Saved estimate report");
    }
    if let Some(path) = &args.pdf {
        let bytes = render_estimate_pdf(&report)?;
        write_atomic(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote estimate PDF");
    }

    let mut stdout = io::stdout().lock();
    if json {
        let body = serde_json::to_string_pretty(&report).map_err(|e| EstimateError::serialization(e.to_string()))?;
        writeln!(stdout, "{}", body)?;
    } else {
        render::write_estimate(&mut stdout, &report)?;
    }
    Ok(())
}

fn read_options(path: &Path) -> Result<OptionsBag, CliError> {
    let content = fs::read_to_string(path)
        .map_err(|e| EstimateError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(OptionsBag::from_json(&content)?)
}

fn show_rates(rates: &RateTable, json: bool) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    if json {
        let body = serde_json::to_string_pretty(rates).map_err(|e| EstimateError::serialization(e.to_string()))?;
        writeln!(stdout, "{}", body)?;
    } else {
        render::write_rates(&mut stdout, rates)?;
    }
    Ok(())
}

fn wizard(args: &WizardArgs, rates: Arc<RateTable>) -> Result<(), CliError> {
    let services = if args.offline {
        Collaborators {
            resolver: None,
            context: Box::new(NoContext),
            imagery: Box::new(FallbackImagery),
            delivery: Box::new(FileOutbox::new(&args.outbox)),
        }
    } else {
        Collaborators {
            resolver: Some(Box::new(BanAddressResolver::new(SEARCH_LIMIT))),
            context: Box::new(OverpassContextProvider),
            imagery: Box::new(StreetViewImagery::new(args.api_key.clone())),
            delivery: Box::new(FileOutbox::new(&args.outbox)),
        }
    };

    let mut wizard = Wizard::new(rates);
    info!(session = %wizard.session().id(), offline = args.offline, "Wizard started");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut prompter = Prompter::new(stdin, stdout);
    interactive::run(&mut prompter, &mut wizard, &services)
}
