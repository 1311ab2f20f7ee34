//! egui painter backend for the hover layer.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::config::HoverConfig;
use crate::data::geometry::Margin;
use crate::data::series::{Circle, SeriesKey};

use super::scene::{HoverScene, PathEmphasis};
use super::{
    AxisLabel, GuideLine, HoverRenderer, LabelSize, Layer, MarkerState, Orientation, SeriesPath,
};

/// Horizontal and vertical padding around label text.
const LABEL_PADDING: egui::Vec2 = egui::vec2(4.0, 2.0);

/// Hover layer drawn with an [`egui::Painter`].
///
/// State lives in a [`HoverScene`]; this type adds label measurement through
/// egui's text layout and the actual painting. Call
/// [`set_painter`](Self::set_painter) every frame before handling events so
/// labels are measured with the current fonts.
pub struct EguiHoverLayer {
    scene: HoverScene,
    painter: Option<Painter>,
    font: FontId,
    marker_radius: f32,
    active_marker_radius: f32,
    dash: [f32; 2],
    guide_color: Color32,
    label_fill: Color32,
    label_text: Color32,
}

impl EguiHoverLayer {
    pub fn new(cfg: &HoverConfig) -> Self {
        Self {
            scene: HoverScene::new(),
            painter: None,
            font: FontId::monospace(12.0),
            marker_radius: cfg.marker_radius,
            active_marker_radius: cfg.active_marker_radius,
            dash: cfg.guide_dash,
            guide_color: Color32::from_gray(150),
            label_fill: Color32::from_gray(40),
            label_text: Color32::WHITE,
        }
    }

    pub fn set_painter(&mut self, painter: Painter) {
        self.painter = Some(painter);
    }

    pub fn scene(&self) -> &HoverScene {
        &self.scene
    }

    /// Paint guide lines, markers and labels. `chart_rect` is the chart's
    /// outer rectangle on screen.
    pub fn paint(&self, painter: &Painter, chart_rect: Rect, margin: &Margin) {
        let plot_origin = chart_rect.min + egui::vec2(margin.left as f32, margin.top as f32);
        let to_screen = |x: f64, y: f64| Pos2::new(plot_origin.x + x as f32, plot_origin.y + y as f32);

        let guide = Stroke::new(1.0, self.guide_color);
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            if let Some(GuideLine { line, .. }) = self.scene.guide_line(orientation) {
                let points = [to_screen(line.x1, line.y1), to_screen(line.x2, line.y2)];
                painter.extend(egui::Shape::dashed_line(&points, guide, self.dash[0], self.dash[1]));
            }
        }

        let dim = self.scene.layer_highlight(Layer::Attributes);
        for marker in self.scene.markers() {
            let center = to_screen(marker.x, marker.y);
            match marker.state {
                MarkerState::Normal => {
                    let fill = if dim {
                        marker.color.gamma_multiply(0.4)
                    } else {
                        marker.color
                    };
                    painter.circle_filled(center, self.marker_radius, fill);
                }
                MarkerState::Active => {
                    painter.circle_filled(center, self.active_marker_radius, marker.color);
                }
                MarkerState::Focused => {
                    painter.circle(
                        center,
                        self.active_marker_radius,
                        marker.color,
                        Stroke::new(2.0, Color32::WHITE),
                    );
                }
            }
        }

        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            if let Some(label) = self.scene.axis_label(orientation) {
                let r = &label.rect;
                let rect = Rect::from_min_size(
                    chart_rect.min + egui::vec2(r.left as f32, r.top as f32),
                    egui::vec2(r.width as f32, r.height as f32),
                );
                painter.rect_filled(rect, 2.0, self.label_fill);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    &label.text,
                    self.font.clone(),
                    self.label_text,
                );
            }
        }
    }
}

/// Stroke for a series path under the current hover emphasis.
pub fn series_stroke(color: Color32, width: f32, emphasis: PathEmphasis) -> Stroke {
    match emphasis {
        PathEmphasis::Normal => Stroke::new(width, color),
        PathEmphasis::Dimmed => Stroke::new(
            width,
            Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 40),
        ),
        PathEmphasis::Highlighted => Stroke::new(width * 1.3, color),
        PathEmphasis::Active => Stroke::new((width * 1.6).max(width + 1.0), color),
    }
}

impl HoverRenderer for EguiHoverLayer {
    fn set_series(&mut self, paths: &[SeriesPath]) {
        self.scene.set_series(paths);
    }

    fn set_layer_highlight(&mut self, layer: Layer, on: bool) {
        self.scene.set_layer_highlight(layer, on);
    }

    fn draw_markers(&mut self, circles: &[Circle]) {
        self.scene.draw_markers(circles);
    }

    fn set_marker_state(&mut self, key: &SeriesKey, state: MarkerState) {
        self.scene.set_marker_state(key, state);
    }

    fn set_active_series(&mut self, key: &SeriesKey) -> bool {
        self.scene.set_active_series(key)
    }

    fn clear_active_series(&mut self, key: &SeriesKey) {
        self.scene.clear_active_series(key);
    }

    fn draw_guide_line(&mut self, line: GuideLine) {
        self.scene.draw_guide_line(line);
    }

    fn remove_guide_line(&mut self, orientation: Orientation) {
        self.scene.remove_guide_line(orientation);
    }

    fn draw_axis_label(&mut self, label: AxisLabel) {
        self.scene.draw_axis_label(label);
    }

    fn remove_axis_label(&mut self, orientation: Orientation) {
        self.scene.remove_axis_label(orientation);
    }

    fn measure_label(&self, _orientation: Orientation, text: &str) -> Option<LabelSize> {
        let painter = self.painter.as_ref()?;
        let galley = painter.layout_no_wrap(text.to_owned(), self.font.clone(), self.label_text);
        let size = galley.size();
        Some(LabelSize::new(
            (size.x + 2.0 * LABEL_PADDING.x) as f64,
            (size.y + 2.0 * LABEL_PADDING.y) as f64,
        ))
    }

    fn clear_all(&mut self) {
        self.scene.clear_all();
    }
}
