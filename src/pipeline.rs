use std::path::PathBuf;

use anyhow::Context;

use crate::chart::annotate::annotate;
use crate::chart::compose::compose;
use crate::chart::model::Chart;
use crate::data::encoding::TextEncoding;
use crate::data::extract::{Plan, extract};
use crate::data::loader::load_table;
use crate::sink::{self, OutputTarget};

/// Everything one run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub plan: Plan,
    pub input: PathBuf,
    pub encoding: TextEncoding,
    /// Trigger rate to call out. Only the paired plan sets one.
    pub target: Option<f64>,
    pub output: OutputTarget,
}

// ---------------------------------------------------------------------------
// Load -> extract -> compose -> annotate -> emit
// ---------------------------------------------------------------------------

/// Load the input and build the finished chart without emitting it.
pub fn build_chart(config: &RunConfig) -> anyhow::Result<Chart> {
    let table = load_table(&config.input, config.encoding)
        .with_context(|| format!("failed to load '{}'", config.input.display()))?;

    let series = extract(&table, &config.plan.schema()).with_context(|| {
        format!(
            "'{}' does not fit the {} layout",
            config.input.display(),
            config.plan.name()
        )
    })?;

    let mut chart = compose(config.plan, series);

    if let Some(target) = config.target {
        if annotate(&mut chart, target).is_none() {
            log::warn!("No finite trigger rate near {target}; chart has no callout");
        }
    }
    Ok(chart)
}

/// Run the whole pipeline, ending in a window or a PNG file.
pub fn run(config: &RunConfig) -> anyhow::Result<()> {
    let chart = build_chart(config)?;
    log::info!(
        "Composed '{}' with {} series",
        chart.title,
        chart.series().count()
    );

    sink::emit(chart, &config.output).context("failed to emit chart")?;

    if config.output.mode == sink::OutputMode::Save {
        log::info!("Wrote {}", config.output.path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::{DataLoadError, OutOfRangeError};
    use crate::render::raster::RasterSettings;
    use crate::sink::OutputMode;

    fn config(plan: Plan, input: PathBuf, target: Option<f64>) -> RunConfig {
        RunConfig {
            plan,
            input,
            encoding: TextEncoding::Utf8,
            target,
            output: OutputTarget {
                mode: OutputMode::Save,
                path: PathBuf::from("unused.png"),
                raster: RasterSettings::default(),
            },
        }
    }

    fn csv_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn paired_input_builds_an_annotated_chart() {
        let file = csv_file(
            "Trigger/Day, Net_Gain(Week), Value_Per_Trigger(Coeff)\n\
             1, 0.1, 0.5\n\
             2, 0.2, 0.4\n\
             3, 0.25, 0.3\n",
        );
        let chart =
            build_chart(&config(Plan::Paired, file.path().to_path_buf(), Some(2.0))).unwrap();

        assert_eq!(chart.series().count(), 2);
        assert_eq!(chart.annotations.len(), 1);
        assert_eq!(chart.annotations[0].anchor, (2.0, 0.2));
        assert!(chart.annotations[0].text.contains("0.400"));
    }

    #[test]
    fn grouped_input_with_too_few_columns_is_out_of_range() {
        let file = csv_file("Trigger/Day, Gain30, Rest30\n2, 1.0, 0.1\n");
        let err = build_chart(&config(Plan::Grouped, file.path().to_path_buf(), None)).unwrap_err();

        let cause = err.downcast_ref::<OutOfRangeError>().unwrap();
        assert_eq!(cause.available, 3);
    }

    #[test]
    fn missing_input_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_chart(&config(Plan::Paired, dir.path().join("absent.csv"), Some(3.0)))
            .unwrap_err();

        assert!(err.chain().any(|cause| cause.is::<DataLoadError>()));
    }
}
