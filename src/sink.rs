use std::path::PathBuf;

use clap::ValueEnum;

use crate::chart::model::Chart;
use crate::error::RenderError;
use crate::render::raster::{self, RasterSettings};

/// Where a finished chart goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Open a window and wait until it is closed.
    Show,
    /// Write a PNG file.
    Save,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub mode: OutputMode,
    /// Destination file, used in [`OutputMode::Save`].
    pub path: PathBuf,
    pub raster: RasterSettings,
}

/// Hand the chart to the display or to the PNG writer.
pub fn emit(chart: Chart, target: &OutputTarget) -> Result<(), RenderError> {
    match target.mode {
        OutputMode::Show => crate::app::show(chart),
        OutputMode::Save => raster::save_png(&chart, &target.path, &target.raster),
    }
}
