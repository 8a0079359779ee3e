use eframe::egui;

use crate::chart::model::Chart;
use crate::error::RenderError;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// A read-only window around one composed chart.
pub struct ChartViewer {
    pub chart: Chart,
}

impl ChartViewer {
    pub fn new(chart: Chart) -> Self {
        Self { chart }
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.chart);
        });
    }
}

/// Open a window showing `chart` and block until it is closed.
pub fn show(chart: Chart) -> Result<(), RenderError> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = chart.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            // Chart colours are picked for a white canvas.
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(ChartViewer::new(chart)))
        }),
    )
    .map_err(|e| RenderError::Display(e.to_string()))
}
