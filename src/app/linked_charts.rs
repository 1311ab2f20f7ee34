//! eframe app showing a stack of charts whose hover and focus are linked.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};

use crate::config::HoverConfig;
use crate::data::geometry::{ChartBox, Margin, PixelPos};
use crate::data::scale::LinearScale;
use crate::data::series::SeriesKey;
use crate::group::FocusGroup;
use crate::hover::{PointerEvent, RedrawPolicy};
use crate::render::{series_stroke, EguiHoverLayer};

use super::demo_data::{x_extent, y_extent, DemoChart};

const LINE_WIDTH: f32 = 1.5;

/// Remember the hovered legend entry; yields it only on the frame the hover
/// moves onto it.
fn legend_hover_started(
    last: &mut Option<SeriesKey>,
    hovered: Option<SeriesKey>,
) -> Option<SeriesKey> {
    if *last == hovered {
        return None;
    }
    *last = hovered.clone();
    hovered
}

/// Host-side bookkeeping for one chart of the group.
pub struct ChartPanel {
    pub title: String,
    index: usize,
    margin: Margin,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    /// Size the scales were last built for.
    size: Option<egui::Vec2>,
    /// Last pointer position in chart space while hovered.
    last_pointer: Option<PixelPos>,
    /// Legend entry hovered on the previous frame.
    legend_hover: Option<SeriesKey>,
}

pub struct LinkedChartsApp {
    cfg: HoverConfig,
    group: FocusGroup<EguiHoverLayer>,
    panels: Vec<ChartPanel>,
}

impl LinkedChartsApp {
    pub fn new(cfg: HoverConfig, charts: Vec<DemoChart>) -> Self {
        let mut group = FocusGroup::new(cfg.clone());
        let margin = Margin::new(10.0, 20.0, 30.0, 60.0);
        let mut panels = Vec::with_capacity(charts.len());
        for chart in charts {
            let x_domain = x_extent(&chart.series);
            let y_domain = y_extent(&chart.series);
            // real extents are bound on the first frame
            let index = group.add_chart(
                ChartBox::new(0.0, 0.0, margin),
                LinearScale::new(x_domain, (0.0, 0.0)),
                LinearScale::new(y_domain, (0.0, 0.0)),
                EguiHoverLayer::new(&cfg),
            );
            if let Some(engine) = group.chart_mut(index) {
                engine.set_series(chart.series);
            }
            panels.push(ChartPanel {
                title: chart.title,
                index,
                margin,
                x_domain,
                y_domain,
                size: None,
                last_pointer: None,
                legend_hover: None,
            });
        }
        Self { cfg, group, panels }
    }

    fn show_chart(&mut self, ui: &mut egui::Ui, panel: usize, height: f32) {
        let Some(p) = self.panels.get_mut(panel) else {
            return;
        };
        let index = p.index;

        ui.horizontal(|ui| {
            ui.strong(&p.title);
            let Some(engine) = self.group.chart_mut(index) else {
                return;
            };
            let keys: Vec<(SeriesKey, Color32)> =
                engine.series().iter().map(|s| (s.key.clone(), s.color)).collect();
            let mut hovered = None;
            for (key, color) in keys {
                let legend = ui.label(egui::RichText::new(key.as_str()).color(color));
                if legend.hovered() {
                    hovered = Some(key);
                }
            }
            if let Some(key) = legend_hover_started(&mut p.legend_hover, hovered) {
                engine.set_active_line(&key, RedrawPolicy::Diff);
            }
        });
        self.group.process_sync();

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::click());
        let painter = ui.painter_at(rect);

        if p.size != Some(rect.size()) {
            p.size = Some(rect.size());
            let chart = ChartBox::new(rect.width() as f64, rect.height() as f64, p.margin);
            let plot = chart.plot_box();
            if let Some(engine) = self.group.chart_mut(index) {
                engine.update_scales(
                    chart,
                    LinearScale::new(p.x_domain, (0.0, plot.width)),
                    LinearScale::new(p.y_domain, (plot.height, 0.0)),
                );
                engine.init();
            }
            self.group.process_sync();
        }

        if let Some(engine) = self.group.chart_mut(index) {
            engine.renderer_mut().set_painter(painter.clone());
            engine.set_chart_origin(Some(PixelPos::new(rect.min.x as f64, rect.min.y as f64)));
        }

        let to_chart =
            |pos: Pos2| PixelPos::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let event = match response.hover_pos().map(to_chart) {
            Some(pos) if response.clicked() => {
                Some(click_event(&self.group, self.cfg.active_marker_radius, index, pos))
            }
            Some(pos) if Some(pos) != p.last_pointer => {
                p.last_pointer = Some(pos);
                Some(PointerEvent::Move(pos))
            }
            Some(_) => None,
            None => p.last_pointer.take().map(|_| {
                let chart = ChartBox::new(rect.width() as f64, rect.height() as f64, p.margin);
                let pos = ui
                    .ctx()
                    .pointer_latest_pos()
                    .map(to_chart)
                    .filter(|pos| !chart.is_inside_plot(pos.x, pos.y))
                    .unwrap_or(PixelPos::new(-1.0, -1.0));
                PointerEvent::Leave(pos)
            }),
        };
        if let Some(event) = event {
            self.group.dispatch(index, event);
        }

        self.paint_chart(&painter, rect, index, &self.panels[panel]);
    }

    fn paint_chart(&self, painter: &egui::Painter, rect: Rect, index: usize, panel: &ChartPanel) {
        let Some(engine) = self.group.chart(index) else {
            return;
        };
        let m = &panel.margin;
        let plot_rect = Rect::from_min_max(
            rect.min + egui::vec2(m.left as f32, m.top as f32),
            rect.max - egui::vec2(m.right as f32, m.bottom as f32),
        );
        let axis = Stroke::new(1.0, Color32::from_gray(90));
        painter.rect_stroke(plot_rect, 0.0, axis, egui::StrokeKind::Inside);

        let font = FontId::monospace(10.0);
        let text = Color32::from_gray(160);
        let ticks = [
            (plot_rect.left_bottom() + egui::vec2(0.0, 4.0), Align2::LEFT_TOP, format!("{:.0}", panel.x_domain.0)),
            (plot_rect.right_bottom() + egui::vec2(0.0, 4.0), Align2::RIGHT_TOP, format!("{:.0}", panel.x_domain.1)),
            (plot_rect.left_top() - egui::vec2(4.0, 0.0), Align2::RIGHT_TOP, format!("{:.2}", panel.y_domain.1)),
            (plot_rect.left_bottom() - egui::vec2(4.0, 0.0), Align2::RIGHT_BOTTOM, format!("{:.2}", panel.y_domain.0)),
        ];
        for (pos, align, label) in ticks {
            painter.text(pos, align, label, font.clone(), text);
        }

        let (x0, x1) = panel.x_domain;
        let (y0, y1) = panel.y_domain;
        let sx = |x: f64| plot_rect.left() + ((x - x0) / (x1 - x0)) as f32 * plot_rect.width();
        let sy = |y: f64| plot_rect.bottom() - ((y - y0) / (y1 - y0)) as f32 * plot_rect.height();

        let scene = engine.renderer().scene();
        let line_painter = painter.with_clip_rect(plot_rect);
        // scene order puts highlighted and active paths last
        for path in scene.paths() {
            let Some(series) = engine.series().iter().find(|s| s.key == path.key) else {
                continue;
            };
            let points: Vec<Pos2> = series
                .x_values
                .iter()
                .zip(&series.y_values)
                .map(|(&x, &y)| Pos2::new(sx(x), sy(y)))
                .collect();
            let stroke = series_stroke(series.color, LINE_WIDTH, scene.path_emphasis(&path.key));
            line_painter.line(points, stroke);
        }

        engine.renderer().paint(painter, rect, m);
    }
}

/// A click within reach of a marker focuses it; anywhere else is a
/// background click.
fn click_event(
    group: &FocusGroup<EguiHoverLayer>,
    marker_radius: f32,
    index: usize,
    pos: PixelPos,
) -> PointerEvent {
    let Some(engine) = group.chart(index) else {
        return PointerEvent::BackgroundClick(pos);
    };
    let margin = engine.chart_box().margin;
    let local = PixelPos::new(pos.x - margin.left, pos.y - margin.top);
    let reach = marker_radius as f64 + 2.0;
    engine
        .circles()
        .iter()
        .map(|c| (c, PixelPos::new(c.x, c.y).distance(local)))
        .filter(|(_, d)| *d <= reach)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| PointerEvent::MarkerClick(c.key.clone()))
        .unwrap_or(PointerEvent::BackgroundClick(pos))
}

impl eframe::App for LinkedChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let n = self.panels.len().max(1) as f32;
            let spacing = ui.spacing().item_spacing.y;
            let height = ((ui.available_height() - spacing * 2.0 * n) / n - 20.0).max(80.0);
            for panel in 0..self.panels.len() {
                self.show_chart(ui, panel, height);
            }
        });
        // anything queued by this frame's handlers
        self.group.process_sync();
    }
}
