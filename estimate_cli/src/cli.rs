use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use estimate_core::calculations::geometry::{BuildingKind, ZoneSelection, DEFAULT_LEVEL_HEIGHT_M, DEFAULT_WIDTH_FLOOR_M};
use estimate_core::materials::ConditionRating;

#[derive(Parser, Debug)]
#[command(name = "ravel", version, about = "Indicative façade renovation estimates")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "RAVEL_RATES",
        help = "Rate table (TOML) to price with instead of the built-in one"
    )]
    pub rates: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price one façade from dimensions given on the command line
    Estimate(EstimateArgs),
    /// Walk through the six wizard stages interactively
    Wizard(WizardArgs),
    /// Show the active rate table
    Rates,
}

#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Attached)]
    pub kind: KindArg,
    #[arg(long, default_value_t = 5)]
    pub levels: i32,
    #[arg(long, default_value_t = DEFAULT_LEVEL_HEIGHT_M, help = "Height of one level (m)")]
    pub level_height: f64,
    #[arg(long, help = "Street frontage width (m)")]
    pub street_width: f64,
    #[arg(long, help = "Rear frontage width (m), defaults to the street width")]
    pub rear_width: Option<f64>,
    #[arg(long, help = "Building depth (m), defaults to the street width")]
    pub depth: Option<f64>,
    #[arg(long, default_value_t = false, help = "Also treat one side wall")]
    pub side_wall: bool,
    #[arg(long, value_enum, default_value_t = ZonesArg::Street)]
    pub zones: ZonesArg,
    #[arg(long, default_value_t = DEFAULT_WIDTH_FLOOR_M, help = "Minimum width used for degenerate inputs (m)")]
    pub width_floor: f64,
    #[arg(long, help = "Support material, e.g. RENDERED_CEMENT, CUT_STONE, brique")]
    pub support: String,
    #[arg(long, value_enum)]
    pub condition: ConditionArg,
    #[arg(long, help = "Options bag as a JSON file; absent keys are zero")]
    pub options: Option<PathBuf>,
    #[arg(long, help = "Also render the estimate to this PDF file")]
    pub pdf: Option<PathBuf>,
    #[arg(long, help = "Save the estimate report (JSON) to this file")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct WizardArgs {
    #[arg(long, default_value_t = false, help = "Do not contact any remote service")]
    pub offline: bool,
    #[arg(long, env = "RAVEL_OUTBOX", default_value = "outbox", help = "Directory deliveries are written to")]
    pub outbox: PathBuf,
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, help = "Street View embed API key")]
    pub api_key: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Attached,
    Detached,
}

impl From<KindArg> for BuildingKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Attached => BuildingKind::Attached,
            KindArg::Detached => BuildingKind::Detached,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ZonesArg {
    Street,
    Rear,
    Both,
}

impl From<ZonesArg> for ZoneSelection {
    fn from(value: ZonesArg) -> Self {
        match value {
            ZonesArg::Street => ZoneSelection::Street,
            ZonesArg::Rear => ZoneSelection::Rear,
            ZonesArg::Both => ZoneSelection::Both,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConditionArg {
    Good,
    Average,
    Degraded,
}

impl From<ConditionArg> for ConditionRating {
    fn from(value: ConditionArg) -> Self {
        match value {
            ConditionArg::Good => ConditionRating::Good,
            ConditionArg::Average => ConditionRating::Average,
            ConditionArg::Degraded => ConditionRating::Degraded,
        }
    }
}
