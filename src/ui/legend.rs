use eframe::egui::{self, Align2, Order, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, vec2};

use super::plot::to_egui;
use crate::chart::model::{Corner, LegendBlock, LegendEntry, Pattern};

const MARGIN: f32 = 8.0;
const SWATCH: egui::Vec2 = egui::Vec2::new(28.0, 12.0);

// ---------------------------------------------------------------------------
// Legend blocks painted over the plot frame
// ---------------------------------------------------------------------------

/// Paint each legend block as a small foreground area in its corner of
/// `frame` (the plot's data rectangle).
pub fn overlay(ui: &Ui, frame: Rect, blocks: &[LegendBlock]) {
    for (i, block) in blocks.iter().enumerate() {
        let (pivot, pos) = placement(block.corner, frame);
        egui::Area::new(ui.id().with(("legend", i)))
            .order(Order::Foreground)
            .pivot(pivot)
            .fixed_pos(pos)
            .interactable(false)
            .show(ui.ctx(), |ui: &mut Ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui: &mut Ui| {
                    if let Some(title) = &block.title {
                        ui.vertical_centered(|ui: &mut Ui| {
                            ui.label(RichText::new(title).strong());
                        });
                    }
                    for entry in &block.entries {
                        entry_row(ui, entry);
                    }
                });
            });
    }
}

fn placement(corner: Corner, frame: Rect) -> (Align2, Pos2) {
    match corner {
        Corner::UpperLeft => (Align2::LEFT_TOP, frame.left_top() + vec2(MARGIN, MARGIN)),
        Corner::CenterLeft => (Align2::LEFT_CENTER, frame.left_center() + vec2(MARGIN, 0.0)),
        Corner::CenterRight => (Align2::RIGHT_CENTER, frame.right_center() - vec2(MARGIN, 0.0)),
    }
}

fn entry_row(ui: &mut Ui, entry: &LegendEntry) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(SWATCH, Sense::hover());
        let color = to_egui(entry.color);
        let ends = [rect.left_center(), rect.right_center()];
        let stroke = Stroke::new(2.0, color);
        match entry.pattern {
            Pattern::Solid => {
                ui.painter().line_segment(ends, stroke);
            }
            Pattern::Dashed => {
                ui.painter().extend(Shape::dashed_line(&ends, stroke, 6.0, 3.0));
            }
            Pattern::Dotted => {
                ui.painter().extend(Shape::dotted_line(&ends, color, 4.0, 1.2));
            }
        }
        ui.label(&entry.label);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_pivot_towards_their_corner() {
        let frame = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(400.0, 200.0));

        let (pivot, pos) = placement(Corner::UpperLeft, frame);
        assert_eq!(pivot, Align2::LEFT_TOP);
        assert_eq!(pos, Pos2::new(MARGIN, MARGIN));

        let (pivot, pos) = placement(Corner::CenterLeft, frame);
        assert_eq!(pivot, Align2::LEFT_CENTER);
        assert_eq!(pos, Pos2::new(MARGIN, 100.0));

        let (pivot, pos) = placement(Corner::CenterRight, frame);
        assert_eq!(pivot, Align2::RIGHT_CENTER);
        assert_eq!(pos, Pos2::new(400.0 - MARGIN, 100.0));
    }
}
