/// Interactive display: egui plot of a composed chart plus painted legends.
pub mod legend;
pub mod plot;
