//! Command-line parsing.
//!
//! One subcommand per chart variant. Defaults reproduce how each variant's
//! input has been exported so far; every one of them can be overridden.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::encoding::TextEncoding;
use crate::data::extract::Plan;
use crate::pipeline::RunConfig;
use crate::render::raster::RasterSettings;
use crate::sink::{OutputMode, OutputTarget};

/// Upper bound accepted by `--dpi`.
const MAX_DPI: i64 = 1200;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dedenne-charts",
    version,
    about = "Dual-axis charts for Dedenne skill simulation output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Net gain and value per trigger against trigger rate, with a callout.
    Skill(SkillArgs),
    /// Net gain and rest rate for each Dedenne cap level (30% to 70%).
    Cap(CapArgs),
}

/// Options for the skill contribution chart.
#[derive(Debug, Parser, Clone)]
pub struct SkillArgs {
    /// Simulator CSV: trigger rate, net gain, value per trigger.
    #[arg(short, long, default_value = "dedenne_data.csv")]
    pub input: PathBuf,

    /// Text encoding of the input file.
    #[arg(short, long, value_enum, default_value_t = TextEncoding::Utf8)]
    pub encoding: TextEncoding,

    /// Show the chart in a window or save it as PNG.
    #[arg(short, long, value_enum, default_value_t = OutputMode::Show)]
    pub output: OutputMode,

    /// PNG destination when saving.
    #[arg(long, default_value = "dedenne_skill_analysis.png")]
    pub out_file: PathBuf,

    /// Trigger rate (per day) to call out on the chart.
    #[arg(long, default_value_t = 3.0)]
    pub target: f64,

    /// Resolution of the saved PNG.
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..=MAX_DPI))]
    pub dpi: u32,
}

/// Options for the cap comparison chart.
#[derive(Debug, Parser, Clone)]
pub struct CapArgs {
    /// Simulator CSV: trigger rate, then (net gain, rest rate) per cap level.
    #[arg(short, long, default_value = "dedenne_data_cap.csv")]
    pub input: PathBuf,

    /// Text encoding of the input file.
    #[arg(short, long, value_enum, default_value_t = TextEncoding::Utf16)]
    pub encoding: TextEncoding,

    /// Show the chart in a window or save it as PNG.
    #[arg(short, long, value_enum, default_value_t = OutputMode::Save)]
    pub output: OutputMode,

    /// PNG destination when saving.
    #[arg(long, default_value = "dedenne_cap_analysis.png")]
    pub out_file: PathBuf,

    /// Resolution of the saved PNG.
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..=MAX_DPI))]
    pub dpi: u32,
}

impl Command {
    /// Resolve parsed arguments into a run configuration.
    pub fn into_config(self) -> RunConfig {
        match self {
            Command::Skill(args) => RunConfig {
                plan: Plan::Paired,
                input: args.input,
                encoding: args.encoding,
                target: Some(args.target),
                output: output_target(args.output, args.out_file, args.dpi),
            },
            Command::Cap(args) => RunConfig {
                plan: Plan::Grouped,
                input: args.input,
                encoding: args.encoding,
                target: None,
                output: output_target(args.output, args.out_file, args.dpi),
            },
        }
    }
}

fn output_target(mode: OutputMode, path: PathBuf, dpi: u32) -> OutputTarget {
    OutputTarget {
        mode,
        path,
        raster: RasterSettings {
            dpi,
            ..RasterSettings::default()
        },
    }
}
