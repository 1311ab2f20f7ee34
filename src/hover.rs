//! Per-chart hover / focus state machine.
//!
//! A [`HoverEngine`] turns pointer events on one chart into renderer calls
//! and outbound [`SyncMessage`]s. It reads the group's [`FocusedState`]
//! through a [`FocusHandle`] but never writes it; the receiving
//! [`FocusGroup`](crate::group::FocusGroup) does that.
//!
//! [`FocusedState`]: crate::data::focus::FocusedState

use crate::config::{HighlightMode, HoverConfig};
use crate::data::focus::{ActivePoint, FocusHandle};
use crate::data::geometry::{clamp, ChartBox, PixelPos, PlotCoordinates};
use crate::data::nearest::{closest_circle, nearest_per_series};
use crate::data::scale::AxisScale;
use crate::data::series::{Circle, Series, SeriesKey};
use crate::data::value_formatter::ValueFormatter;
use crate::render::{
    layout, AxisLabel, GuideLine, HoverRenderer, Layer, MarkerState, Orientation, SeriesPath,
};
use crate::sync::{SyncEnvelope, SyncMessage, SyncSink};

/// Whether a focus update may skip redrawing parts that did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedrawPolicy {
    /// Redraw the active line only when the closest series changed and the
    /// markers, guides and labels only when the active point moved.
    #[default]
    Diff,
    /// Redraw everything.
    Always,
}

impl RedrawPolicy {
    fn is_always(self) -> bool {
        matches!(self, RedrawPolicy::Always)
    }
}

/// Pointer input in chart space, as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Move(PixelPos),
    Leave(PixelPos),
    MarkerClick(SeriesKey),
    BackgroundClick(PixelPos),
}

pub struct HoverEngine<R: HoverRenderer> {
    index: usize,
    chart: ChartBox,
    x_scale: Box<dyn AxisScale>,
    y_scale: Box<dyn AxisScale>,
    series: Vec<Series>,
    renderer: R,
    focus: FocusHandle,
    sink: Option<Box<dyn SyncSink>>,
    x_formatter: ValueFormatter,
    y_formatter: ValueFormatter,
    precision: usize,
    highlight_mode: HighlightMode,
    /// Chart origin in page coordinates.
    chart_origin: Option<PixelPos>,

    // local attributes state
    line_key: Option<SeriesKey>,
    active_point: Option<ActivePoint>,
    x_step: Option<f64>,
    circles: Vec<Circle>,
}

impl<R: HoverRenderer> HoverEngine<R> {
    pub fn new(
        index: usize,
        chart: ChartBox,
        x_scale: impl AxisScale + 'static,
        y_scale: impl AxisScale + 'static,
        renderer: R,
        focus: FocusHandle,
    ) -> Self {
        let defaults = HoverConfig::default();
        Self {
            index,
            chart,
            x_scale: Box::new(x_scale),
            y_scale: Box::new(y_scale),
            series: Vec::new(),
            renderer,
            focus,
            sink: None,
            x_formatter: ValueFormatter::for_alignment(defaults.x_alignment),
            y_formatter: ValueFormatter::Auto,
            precision: defaults.value_precision,
            highlight_mode: defaults.highlight_mode,
            chart_origin: None,
            line_key: None,
            active_point: None,
            x_step: None,
            circles: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: impl SyncSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Apply highlight mode, x formatting and precision from `cfg`.
    pub fn with_config(mut self, cfg: &HoverConfig) -> Self {
        self.highlight_mode = cfg.highlight_mode;
        self.x_formatter = ValueFormatter::for_alignment(cfg.x_alignment);
        self.precision = cfg.value_precision;
        if !self.series.is_empty() {
            self.push_paths();
        }
        self
    }

    pub fn set_formatters(&mut self, x: ValueFormatter, y: ValueFormatter) {
        self.x_formatter = x;
        self.y_formatter = y;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn chart_box(&self) -> &ChartBox {
        &self.chart
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// The point this instance last resolved itself.
    pub fn active_point(&self) -> Option<&ActivePoint> {
        self.active_point.as_ref()
    }

    /// Key of the series currently styled as active.
    pub fn line_key(&self) -> Option<&SeriesKey> {
        self.line_key.as_ref()
    }

    pub fn x_step(&self) -> Option<f64> {
        self.x_step
    }

    /// Circles of the last search (what the markers show).
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Replace the chart's series. Called at draw time.
    pub fn set_series(&mut self, series: Vec<Series>) {
        self.series = series;
        self.push_paths();
    }

    /// Rebind scales and chart box after a resize or zoom. Existing hover
    /// state is not redrawn; follow with [`init`](Self::init).
    pub fn update_scales(
        &mut self,
        chart: ChartBox,
        x_scale: impl AxisScale + 'static,
        y_scale: impl AxisScale + 'static,
    ) {
        self.chart = chart;
        self.x_scale = Box::new(x_scale);
        self.y_scale = Box::new(y_scale);
    }

    /// Where the chart sits on the page; used for `page_x` / `page_y`.
    pub fn set_chart_origin(&mut self, origin: Option<PixelPos>) {
        self.chart_origin = origin;
    }

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move(pos) => self.on_pointer_move(pos),
            PointerEvent::Leave(pos) => self.on_pointer_leave(pos),
            PointerEvent::MarkerClick(key) => self.on_marker_click(&key),
            PointerEvent::BackgroundClick(pos) => self.on_background_click(pos),
        }
    }

    pub fn on_pointer_move(&mut self, pos: PixelPos) {
        if self.focus.is_locked() {
            tracing::trace!(chart = self.index, "pointer move ignored, focus locked");
            return;
        }
        if !self.chart.is_inside_plot(pos.x, pos.y) {
            return;
        }
        if let Some(point) = self.update_focused_chart(pos, RedrawPolicy::Diff) {
            self.broadcast(SyncMessage::ActivePointUpdate {
                point,
                focused_active: None,
            });
        }
    }

    pub fn on_pointer_leave(&mut self, pos: PixelPos) {
        if self.focus.is_locked() || self.chart.is_inside_plot(pos.x, pos.y) {
            return;
        }
        tracing::debug!(chart = self.index, "pointer left plot");
        self.clear_hover_attributes();
        self.broadcast(SyncMessage::Clear);
    }

    /// Click on the marker of series `key`: claim the focus lock for it.
    pub fn on_marker_click(&mut self, key: &SeriesKey) {
        let Some(circle) = self.circles.iter().find(|c| &c.key == key).cloned() else {
            tracing::debug!(chart = self.index, %key, "click on unknown marker");
            return;
        };
        self.release_foreign_focus();
        let pos = self.chart.plot_to_chart(PixelPos::new(circle.x, circle.y));
        let Some(point) = self.update_focused_chart(pos, RedrawPolicy::Always) else {
            return;
        };
        self.renderer.set_marker_state(&point.key, MarkerState::Focused);
        tracing::debug!(chart = self.index, key = %point.key, "focus locked");
        self.broadcast(SyncMessage::ActivePointUpdate {
            point,
            focused_active: Some(true),
        });
    }

    /// Click anywhere else on the chart: drop a lock and hover there.
    pub fn on_background_click(&mut self, pos: PixelPos) {
        self.release_foreign_focus();
        let Some(point) = self.update_focused_chart(pos, RedrawPolicy::Always) else {
            return;
        };
        tracing::debug!(chart = self.index, key = %point.key, "focus released");
        self.broadcast(SyncMessage::ActivePointUpdate {
            point,
            focused_active: Some(false),
        });
    }

    /// Resolve the closest point to a chart-space pointer position and
    /// render it. Returns `None` when no series has samples.
    pub fn update_focused_chart(
        &mut self,
        pos: PixelPos,
        policy: RedrawPolicy,
    ) -> Option<ActivePoint> {
        let at = PlotCoordinates::from_pointer(
            pos,
            &self.chart.margin,
            self.x_scale.as_ref(),
            self.y_scale.as_ref(),
        );
        tracing::trace!(
            chart = self.index,
            x = at.x_value,
            y = at.y_value,
            "pointer in data space"
        );
        let circles = self.nearest_circles(at.mouse_x);
        let target = closest_circle(&circles, at.mouse_x, at.mouse_y)?.clone();
        self.render_point(&circles, &target, policy);
        Some(self.commit_point(&target))
    }

    /// Show markers, the vertical guide and the x label at data position
    /// `x_value`, as requested by a sibling chart.
    pub fn update_hover_attributes(&mut self, x_value: f64) {
        let (lo, hi) = self.x_scale.range_extent();
        let mouse_x = clamp(self.x_scale.apply(x_value), lo, hi);
        let circles = self.nearest_circles(mouse_x);
        let highlight = self.highlight_mode.is_enabled();

        self.renderer.set_layer_highlight(Layer::Lines, highlight);
        self.renderer.set_layer_highlight(Layer::Attributes, highlight);
        self.renderer.draw_markers(&circles);
        self.draw_guide(Orientation::Vertical, mouse_x);
        self.renderer.remove_guide_line(Orientation::Horizontal);
        self.renderer.remove_axis_label(Orientation::Horizontal);
        let x = self.x_scale.invert(mouse_x);
        self.draw_axis_label(Orientation::Vertical, mouse_x, x);

        self.circles = circles;
        // markers no longer show the local active point
        self.active_point = None;
        self.x_step = Some(x);
    }

    /// Drop everything the hover layer shows.
    pub fn clear_hover_attributes(&mut self) {
        self.renderer.clear_all();
        self.active_point = None;
        self.line_key = None;
    }

    /// Make series `key` the active line, e.g. from a legend hover.
    ///
    /// Ignored while any instance holds the focus lock, when another instance
    /// owns the focus, or for unknown keys. With a known x position the whole
    /// hover state moves to `key`'s sample there and is broadcast; otherwise
    /// only the line style changes.
    pub fn set_active_line(&mut self, key: &SeriesKey, policy: RedrawPolicy) {
        let (locked, owner, shared_step) = {
            let state = self.focus.borrow();
            (state.active, state.chart_index, state.x_step)
        };
        if locked || owner.is_some_and(|o| o != self.index) {
            tracing::trace!(chart = self.index, %key, "set_active_line ignored");
            return;
        }
        if !self.series.iter().any(|s| &s.key == key) {
            return;
        }

        let Some(step) = shared_step.or(self.x_step) else {
            if let Some(prev) = self.line_key.take() {
                self.renderer.clear_active_series(&prev);
            }
            self.draw_active_line(key);
            return;
        };

        let (lo, hi) = self.x_scale.range_extent();
        let mouse_x = clamp(self.x_scale.apply(step), lo, hi);
        let circles = self.nearest_circles(mouse_x);
        let Some(target) = circles.iter().find(|c| &c.key == key).cloned() else {
            return;
        };
        self.render_point(&circles, &target, policy);
        let point = self.commit_point(&target);
        self.broadcast(SyncMessage::ActivePointUpdate {
            point,
            focused_active: None,
        });
    }

    /// (Re)draw after mount, data change or resize.
    ///
    /// The focus owner restores its remembered point (and lock); every other
    /// instance shows the last known x, or the end of the x domain.
    pub fn init(&mut self) {
        let state = self.focus.snapshot();
        if state.is_owned_by(self.index) {
            if let Some(remembered) = &state.active_point {
                let local = PixelPos::new(
                    self.x_scale.apply(remembered.x_data),
                    self.y_scale.apply(remembered.y_data),
                );
                let pos = self.chart.plot_to_chart(local);
                if !self.chart.is_inside_plot(pos.x, pos.y) {
                    tracing::debug!(chart = self.index, "remembered point outside plot");
                    return;
                }
                let Some(point) = self.update_focused_chart(pos, RedrawPolicy::Always) else {
                    return;
                };
                if state.active {
                    self.renderer.set_marker_state(&point.key, MarkerState::Focused);
                }
                self.broadcast(SyncMessage::ActivePointUpdate {
                    point,
                    focused_active: Some(state.active),
                });
                return;
            }
        }
        let x = state
            .x_step
            .or(self.x_step)
            .unwrap_or_else(|| self.x_scale.domain().1);
        self.update_hover_attributes(x);
    }

    fn push_paths(&mut self) {
        let paths: Vec<SeriesPath> = self
            .series
            .iter()
            .map(|s| SeriesPath {
                key: s.key.clone(),
                selector: s.highlight_group(self.highlight_mode).to_string(),
                color: s.color,
            })
            .collect();
        self.renderer.set_series(&paths);
    }

    fn nearest_circles(&self, mouse_x: f64) -> Vec<Circle> {
        nearest_per_series(
            &self.series,
            mouse_x,
            self.x_scale.as_ref(),
            self.y_scale.as_ref(),
        )
    }

    fn release_foreign_focus(&mut self) {
        if !self.focus.borrow().is_owned_by(self.index) {
            self.broadcast(SyncMessage::Clear);
        }
    }

    fn render_point(&mut self, circles: &[Circle], target: &Circle, policy: RedrawPolicy) {
        let highlight = self.highlight_mode.is_enabled();

        if policy.is_always() || self.line_key.as_ref() != Some(&target.key) {
            self.renderer.set_layer_highlight(Layer::Lines, highlight);
            if let Some(prev) = self.line_key.take() {
                self.renderer.clear_active_series(&prev);
            }
            self.draw_active_line(&target.key);
        }

        let moved = match &self.active_point {
            Some(p) => p.key != target.key || p.x_pos != target.x || p.y_pos != target.y,
            None => true,
        };
        if policy.is_always() || moved {
            self.renderer.set_layer_highlight(Layer::Attributes, highlight);
            self.renderer.draw_markers(circles);
            self.draw_guide(Orientation::Vertical, target.x);
            self.draw_guide(Orientation::Horizontal, target.y);
            self.draw_axis_label(Orientation::Vertical, target.x, target.x_value);
            self.draw_axis_label(Orientation::Horizontal, target.y, target.y_value);
            self.renderer.set_marker_state(&target.key, MarkerState::Active);
        }
        self.circles = circles.to_vec();
    }

    fn commit_point(&mut self, target: &Circle) -> ActivePoint {
        let origin = self.chart_origin.unwrap_or(PixelPos::ZERO);
        let point = ActivePoint {
            key: target.key.clone(),
            x_value: self.format_x(target.x_value),
            y_value: self.format_y(target.y_value),
            x_data: target.x_value,
            y_data: target.y_value,
            x_pos: target.x,
            y_pos: target.y,
            page_x: origin.x + target.x + self.chart.margin.left,
            page_y: origin.y + target.y + self.chart.margin.top,
            chart_index: self.index,
        };
        self.x_step = Some(point.x_data);
        self.active_point = Some(point.clone());
        point
    }

    fn draw_active_line(&mut self, key: &SeriesKey) {
        if !self.renderer.set_active_series(key) {
            tracing::trace!(chart = self.index, %key, "no path for active series");
        }
        self.line_key = Some(key.clone());
    }

    fn draw_guide(&mut self, orientation: Orientation, position: f64) {
        let line = layout::guide_line(orientation, position, self.chart.plot_box());
        self.renderer.draw_guide_line(GuideLine { orientation, line });
    }

    fn draw_axis_label(&mut self, orientation: Orientation, position: f64, value: f64) {
        if !value.is_finite() {
            self.renderer.remove_axis_label(orientation);
            return;
        }
        let text = match orientation {
            Orientation::Vertical => self.format_x(value),
            Orientation::Horizontal => self.format_y(value),
        };
        let size = self
            .renderer
            .measure_label(orientation, &text)
            .unwrap_or_default();
        let rect = layout::axis_label(&self.chart, orientation, position, size);
        self.renderer.draw_axis_label(AxisLabel {
            orientation,
            text,
            rect,
        });
    }

    fn format_x(&self, value: f64) -> String {
        self.x_formatter
            .format(value, self.x_scale.domain(), self.precision)
    }

    fn format_y(&self, value: f64) -> String {
        self.y_formatter
            .format(value, self.y_scale.domain(), self.precision)
    }

    fn broadcast(&mut self, message: SyncMessage) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        sink.sync(SyncEnvelope {
            source: self.index,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use egui::Color32;

    use super::*;
    use crate::data::geometry::Margin;
    use crate::data::scale::LinearScale;
    use crate::render::HoverScene;

    type Sent = Rc<RefCell<Vec<SyncEnvelope>>>;

    // 400x300 chart, 320x240 plot: 80 px per x unit, 30 px per y unit.
    fn engine() -> (HoverEngine<HoverScene>, Sent) {
        let chart = ChartBox::new(400.0, 300.0, Margin::new(30.0, 30.0, 30.0, 50.0));
        let x = LinearScale::new((0.0, 4.0), (0.0, 320.0));
        let y = LinearScale::new((0.0, 8.0), (240.0, 0.0));
        let sent: Sent = Rc::default();
        let log = sent.clone();
        let mut e = HoverEngine::new(0, chart, x, y, HoverScene::new(), FocusHandle::detached())
            .with_sink(move |env: SyncEnvelope| log.borrow_mut().push(env));
        let xs = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        e.set_series(vec![
            Series::new("S1", Color32::RED, xs.clone(), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
            Series::new("S2", Color32::BLUE, xs, vec![8.0, 7.0, 6.0, 5.0, 4.0]).unwrap(),
        ]);
        (e, sent)
    }

    // chart-space position of data point (x, y)
    fn at(x: f64, y: f64) -> PixelPos {
        PixelPos::new(50.0 + x * 80.0, 30.0 + 240.0 - y * 30.0)
    }

    #[test]
    fn pointer_resolves_through_log_scale() {
        let chart = ChartBox::new(400.0, 300.0, Margin::new(30.0, 30.0, 30.0, 50.0));
        let x = LinearScale::new((0.0, 4.0), (0.0, 320.0));
        let y = crate::data::scale::LogScale::new((1.0, 100.0), (240.0, 0.0));
        let mut e = HoverEngine::new(0, chart, x, y, HoverScene::new(), FocusHandle::detached());
        e.set_series(vec![Series::new(
            "S",
            Color32::RED,
            vec![0.0, 1.0, 2.0],
            vec![1.0, 10.0, 100.0],
        )
        .unwrap()]);
        // one decade is 120 px
        let point = e
            .update_focused_chart(PixelPos::new(50.0 + 80.0, 30.0 + 125.0), RedrawPolicy::Diff)
            .unwrap();
        assert_eq!(point.y_pos, 120.0);
        assert_eq!(point.y_value, "10");
        assert_eq!(point.page_y, 30.0 + 120.0);
    }

    #[test]
    fn pointer_move_resolves_closest_series() {
        let (mut e, sent) = engine();
        e.on_pointer_move(at(1.4, 2.2));
        let point = e.active_point().unwrap();
        assert_eq!(point.key.as_str(), "S1");
        assert_eq!(point.x_data, 1.0);
        assert_eq!(point.x_value, "1");
        assert_eq!(e.line_key().map(|k| k.as_str()), Some("S1"));
        assert_eq!(sent.borrow().len(), 1);
        assert!(matches!(
            sent.borrow()[0].message,
            SyncMessage::ActivePointUpdate { focused_active: None, .. }
        ));
    }

    #[test]
    fn pointer_move_outside_plot_is_ignored() {
        let (mut e, sent) = engine();
        e.on_pointer_move(PixelPos::new(10.0, 10.0));
        assert!(e.active_point().is_none());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn unchanged_position_does_not_redraw() {
        let (mut e, _) = engine();
        e.update_focused_chart(at(1.4, 2.2), RedrawPolicy::Diff);
        let rev = e.renderer().revision();
        e.update_focused_chart(at(1.4, 2.2), RedrawPolicy::Diff);
        assert_eq!(e.renderer().revision(), rev);
        e.update_focused_chart(at(1.4, 2.2), RedrawPolicy::Always);
        assert!(e.renderer().revision() > rev);
    }

    #[test]
    fn leave_clears_and_broadcasts() {
        let (mut e, sent) = engine();
        e.on_pointer_move(at(1.0, 2.0));
        e.on_pointer_leave(PixelPos::new(399.0, 5.0));
        assert!(e.renderer().is_clear());
        assert!(e.active_point().is_none());
        assert_eq!(sent.borrow().last().unwrap().message, SyncMessage::Clear);
    }

    #[test]
    fn marker_click_locks_and_focuses_marker() {
        let (mut e, sent) = engine();
        e.on_pointer_move(at(2.0, 3.0));
        e.on_marker_click(&"S2".into());
        let scene = e.renderer();
        assert_eq!(scene.marker(&"S2".into()).unwrap().state, MarkerState::Focused);
        assert_eq!(scene.marker(&"S1".into()).unwrap().state, MarkerState::Normal);
        let sent = sent.borrow();
        // detached handle never owns focus, so the click clears first
        assert_eq!(sent[1].message, SyncMessage::Clear);
        assert!(matches!(
            sent[2].message,
            SyncMessage::ActivePointUpdate { focused_active: Some(true), .. }
        ));
    }

    #[test]
    fn set_active_line_without_x_step_only_styles() {
        let (mut e, sent) = engine();
        e.set_active_line(&"S2".into(), RedrawPolicy::Diff);
        let scene = e.renderer();
        assert_eq!(scene.active_series().map(|k| k.as_str()), Some("S2"));
        assert!(scene.markers().is_empty());
        assert!(scene.guide_line(Orientation::Vertical).is_none());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn set_active_line_with_x_step_moves_point() {
        let (mut e, sent) = engine();
        e.on_pointer_move(at(1.0, 2.0));
        e.set_active_line(&"S2".into(), RedrawPolicy::Diff);
        let point = e.active_point().unwrap();
        assert_eq!(point.key.as_str(), "S2");
        assert_eq!(point.y_data, 7.0);
        assert_eq!(sent.borrow().len(), 2);
    }

    #[test]
    fn unknown_active_line_is_ignored() {
        let (mut e, _) = engine();
        e.set_active_line(&"S1".into(), RedrawPolicy::Diff);
        let rev = e.renderer().revision();
        e.set_active_line(&"nope".into(), RedrawPolicy::Diff);
        assert_eq!(e.renderer().revision(), rev);
        assert_eq!(e.line_key().map(|k| k.as_str()), Some("S1"));
    }

    #[test]
    fn init_without_state_uses_domain_end() {
        let (mut e, sent) = engine();
        e.init();
        assert_eq!(e.x_step(), Some(4.0));
        let guide = e.renderer().guide_line(Orientation::Vertical).unwrap();
        assert_eq!(guide.line.x1, 320.0);
        assert_eq!(e.renderer().markers().len(), 2);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn sibling_update_clamps_to_range() {
        let (mut e, _) = engine();
        e.update_hover_attributes(100.0);
        let guide = e.renderer().guide_line(Orientation::Vertical).unwrap();
        assert_eq!(guide.line.x1, 320.0);
        assert_eq!(e.x_step(), Some(4.0));
    }

    #[test]
    fn page_position_includes_origin_and_margin() {
        let (mut e, _) = engine();
        e.set_chart_origin(Some(PixelPos::new(100.0, 200.0)));
        let point = e.update_focused_chart(at(1.0, 2.0), RedrawPolicy::Diff).unwrap();
        assert_eq!(point.page_x, 100.0 + 80.0 + 50.0);
        assert_eq!(point.page_y, 200.0 + 180.0 + 30.0);
    }

    #[test]
    fn no_series_yields_no_point() {
        let (mut e, sent) = engine();
        e.set_series(Vec::new());
        e.on_pointer_move(at(1.0, 1.0));
        assert!(e.active_point().is_none());
        assert!(sent.borrow().is_empty());
    }
}
