mod projection;

use egui::{Align, Align2, Color32, FontId, Layout, RichText, Sense, Stroke, Vec2};
use mapscreen::{
    constants::{DETAIL_PANEL_HEIGHT, PREVIEW_HEIGHT, ROUTE_LINE_WIDTH},
    screen::render::{DetailPanelFrame, MapControl, PreviewContent},
    CameraPosition, CatalogMapService, MapScreenController, Region, ScreenConfig,
    ScreenFrame,
};
use projection::Projection;
use std::sync::Arc;
use std::time::Duration;

const ROUTE_BLUE: Color32 = Color32::from_rgb(0, 122, 255);
const MAP_BACKGROUND: Color32 = Color32::from_rgb(230, 230, 230);
const MARKER_HIT_RADIUS: f32 = 12.0;

/// Map browser: `mapscreen-app [catalog.json] [config.json]`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let service = match args.next() {
        Some(path) => CatalogMapService::from_json_file(path)?,
        None => {
            let mut service = CatalogMapService::builtin();
            service.options.simulated_latency_ms = 250;
            service
        }
    };
    let config = match args.next() {
        Some(path) => ScreenConfig::from_json_file(path)?,
        None => ScreenConfig::default(),
    };

    // No sheet animation here, dismissals complete at once
    let controller = MapScreenController::new(Arc::new(service), config)?
        .acknowledge_dismissal_immediately(true);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_title("Map Screen"),
        ..Default::default()
    };

    eframe::run_native(
        "mapscreen-app",
        options,
        Box::new(move |_cc| Box::new(MapScreenApp::new(controller))),
    )?;

    Ok(())
}

struct MapScreenApp {
    controller: MapScreenController,
    query: String,
    /// Camera last requested by the screen, to detect new camera requests
    requested_camera: CameraPosition,
    /// What is on screen, moved by the user between camera requests
    visible_region: Region,
}

impl MapScreenApp {
    fn new(controller: MapScreenController) -> Self {
        let requested_camera = controller.state().camera_position.clone();
        Self {
            visible_region: requested_camera.region(),
            requested_camera,
            controller,
            query: String::new(),
        }
    }

    fn sync_camera(&mut self, frame: &ScreenFrame) {
        for effect in self.controller.take_host_effects() {
            log::debug!("Host effect: {effect:?}");
        }
        if frame.camera != self.requested_camera {
            self.requested_camera = frame.camera.clone();
            self.visible_region = frame.camera.region();
        }
    }

    fn navigation_bar(&mut self, ui: &mut egui::Ui, frame: &ScreenFrame) {
        ui.horizontal(|ui| {
            ui.heading(&frame.title);
            ui.separator();

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search")
                    .desired_width(280.0),
            );
            if response.gained_focus() && !frame.search_presented {
                self.controller.toggle_search_active(true);
            }
            if response.changed() {
                self.controller.set_query(self.query.clone());
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.controller.submit_search();
            }
            if frame.search_presented && ui.button("Cancel").clicked() {
                self.query.clear();
                self.controller.set_query(String::new());
                self.controller.toggle_search_active(false);
            }
        });
    }

    fn detail_panel(&mut self, ui: &mut egui::Ui, panel: &DetailPanelFrame) {
        ui.horizontal(|ui| {
            ui.heading(&panel.title);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").clicked() {
                    self.controller.close_details();
                }
            });
        });

        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), PREVIEW_HEIGHT), Sense::hover());
        let painter = ui.painter();
        match &panel.preview {
            PreviewContent::Scene(scene) => {
                painter.rect_filled(rect, 15.0, Color32::from_rgb(96, 128, 104));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    &scene.scene_id,
                    FontId::proportional(14.0),
                    Color32::WHITE,
                );
            }
            PreviewContent::Unavailable(text) => {
                painter.rect_filled(rect, 15.0, Color32::from_gray(200));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    *text,
                    FontId::proportional(16.0),
                    Color32::DARK_GRAY,
                );
            }
        }

        if let Some(notice) = &panel.route_notice {
            ui.colored_label(Color32::RED, notice);
        }

        let directions = egui::Button::new(RichText::new(panel.directions_label).color(Color32::WHITE))
            .fill(ROUTE_BLUE);
        if ui.add_sized([ui.available_width(), 36.0], directions).clicked() {
            self.controller.request_route();
        }
    }

    fn map(&mut self, ui: &mut egui::Ui, frame: &ScreenFrame) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let projection = Projection::new(self.visible_region, rect);
        painter.rect_filled(rect, 0.0, MAP_BACKGROUND);

        if let Some(polyline) = &frame.route_polyline {
            let points = polyline.iter().map(|c| projection.to_screen(*c)).collect();
            painter.add(egui::Shape::line(points, Stroke::new(ROUTE_LINE_WIDTH, ROUTE_BLUE)));
        }

        // Home annotation, title hidden
        let home = projection.to_screen(frame.home_annotation.coordinate);
        painter.circle_filled(home, 9.0, Color32::BLACK);
        if frame.shows_user_location {
            painter.circle_stroke(home, 13.0, Stroke::new(2.0, ROUTE_BLUE));
        }

        for marker in &frame.markers {
            let pos = projection.to_screen(marker.coordinate);
            painter.circle_filled(pos, 7.0, ROUTE_BLUE);
            painter.text(
                pos - Vec2::new(0.0, 10.0),
                Align2::CENTER_BOTTOM,
                &marker.title,
                FontId::proportional(12.0),
                Color32::DARK_GRAY,
            );
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let hit = frame
                    .markers
                    .iter()
                    .find(|marker| {
                        projection.to_screen(marker.coordinate).distance(pointer) <= MARKER_HIT_RADIUS
                    })
                    .map(|marker| marker.place.clone());
                self.controller.select_place(hit);
            }
        }

        let mut moved = None;
        if response.dragged() {
            moved = Some(projection.panned(response.drag_delta()));
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = (1.0 - scroll as f64 * 0.002).clamp(0.5, 2.0);
                moved = Some(Projection::new(moved.unwrap_or(self.visible_region), rect).zoomed(factor));
            }
        }
        if let Some(region) = moved {
            self.visible_region = region;
            self.controller.on_viewport_change(region);
        }

        self.map_controls(ui, rect, &frame.map_controls);
    }

    /// Compass, pitch and user-location buttons; only the last one moves the map
    fn map_controls(&mut self, ui: &mut egui::Ui, map_rect: egui::Rect, controls: &[MapControl]) {
        let size = Vec2::splat(36.0);
        for (index, control) in controls.iter().rev().enumerate() {
            let offset = Vec2::new(15.0 + size.x, 15.0 + (index as f32 + 1.0) * (size.y + 15.0));
            let min = map_rect.right_bottom() - offset;
            let label = match control {
                MapControl::Compass => "N",
                MapControl::PitchToggle => "3D",
                MapControl::UserLocationButton => "➤",
            };
            let clicked = ui
                .put(egui::Rect::from_min_size(min, size), egui::Button::new(label).rounding(18.0))
                .clicked();
            if clicked && *control == MapControl::UserLocationButton {
                self.visible_region = self.controller.config().home.region();
                self.controller.on_viewport_change(self.visible_region);
            }
        }
    }
}

impl eframe::App for MapScreenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump();
        let frame = self.controller.frame();
        self.sync_camera(&frame);

        if frame.navigation_bar_visible {
            egui::TopBottomPanel::top("navigation").show(ctx, |ui| self.navigation_bar(ui, &frame));
        }

        if let Some(label) = frame.end_route_label {
            egui::TopBottomPanel::bottom("end_route").show(ctx, |ui| {
                let end_route = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(Color32::RED);
                if ui.add_sized([ui.available_width(), 40.0], end_route).clicked() {
                    self.controller.end_route();
                }
            });
        }

        if let Some(panel) = &frame.detail_panel {
            egui::TopBottomPanel::bottom("details")
                .exact_height(DETAIL_PANEL_HEIGHT)
                .show(ctx, |ui| self.detail_panel(ui, panel));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.map(ui, &frame));

        // In-flight first: a task that finishes in between has already sent
        if self.controller.in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if self.controller.has_pending_completions() {
            ctx.request_repaint();
        }
    }
}
