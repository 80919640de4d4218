//! Floating map controls drawn over the map surface.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::SAFE_AREA_MARGIN;
use crate::map::{MapView, RouteOverlay};
use crate::screen::ClearAllRequest;
use crate::theme;

fn control_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(theme::ui::CONTROL_BACKGROUND)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(6))
}

/// Trash button pinned to the top-left safe area
pub fn clear_button_ui(
    mut contexts: EguiContexts,
    mut clear: MessageWriter<ClearAllRequest>,
) -> Result {
    egui::Area::new(egui::Id::new("clear_button"))
        .anchor(
            egui::Align2::LEFT_TOP,
            [SAFE_AREA_MARGIN, SAFE_AREA_MARGIN],
        )
        .order(egui::Order::Foreground)
        .show(contexts.ctx_mut()?, |ui| {
            control_frame().show(ui, |ui| {
                let button = egui::Button::new(egui::RichText::new("🗑").size(20.0))
                    .frame(false)
                    .min_size(egui::vec2(32.0, 32.0));
                if ui
                    .add(button)
                    .on_hover_text("Clear pins and routes (Delete)")
                    .clicked()
                {
                    clear.write(ClearAllRequest);
                }
            });
        });

    Ok(())
}

/// North indicator; the map never rotates so north is always up
pub fn compass_ui(mut contexts: EguiContexts, map_view: Res<MapView>) -> Result {
    if !map_view.shows_compass {
        return Ok(());
    }

    egui::Area::new(egui::Id::new("compass"))
        .anchor(
            egui::Align2::RIGHT_TOP,
            [-SAFE_AREA_MARGIN, SAFE_AREA_MARGIN],
        )
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            control_frame().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("▲")
                            .size(14.0)
                            .color(theme::ui::COMPASS_NORTH),
                    );
                    ui.label(
                        egui::RichText::new("N")
                            .size(14.0)
                            .strong()
                            .color(theme::ui::COMPASS_NORTH),
                    );
                });
            });
        });

    Ok(())
}

fn route_summary(overlay: &RouteOverlay) -> String {
    format!(
        "{:.1} km · {:.0} min",
        overlay.distance_meters / 1000.0,
        (overlay.expected_travel_time_secs / 60.0).ceil()
    )
}

/// Distance and travel time of the shown route
pub fn route_summary_ui(mut contexts: EguiContexts, overlays: Query<&RouteOverlay>) -> Result {
    let Some(overlay) = overlays.iter().next() else {
        return Ok(());
    };

    egui::Area::new(egui::Id::new("route_summary"))
        .anchor(
            egui::Align2::CENTER_BOTTOM,
            [0.0, -SAFE_AREA_MARGIN * 2.0],
        )
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            control_frame().show(ui, |ui| {
                ui.label(
                    egui::RichText::new(route_summary(overlay))
                        .size(15.0)
                        .color(theme::bevy_to_egui(theme::ROUTE_STROKE)),
                );
            });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, Region};

    #[test]
    fn test_route_summary_rounds_minutes_up() {
        let overlay = RouteOverlay {
            polyline: vec![],
            region: Region::around(Coordinate::new(0.0, 0.0), 1000.0, 1000.0),
            distance_meters: 2345.0,
            expected_travel_time_secs: 61.0,
        };
        assert_eq!(route_summary(&overlay), "2.3 km · 2 min");
    }
}
