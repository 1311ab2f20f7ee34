//! Retained, headless hover scene.
//!
//! Holds exactly what a chart's hover layer currently shows. It is the
//! renderer used in tests and the model the egui layer paints from.

use egui::Color32;

use crate::data::series::{Circle, SeriesKey};

use super::{
    AxisLabel, GuideLine, HoverRenderer, LabelSize, Layer, MarkerState, Orientation, SeriesPath,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: SeriesKey,
    pub color: Color32,
    /// Plot space.
    pub x: f64,
    pub y: f64,
    pub state: MarkerState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    pub key: SeriesKey,
    pub selector: String,
    pub color: Color32,
    pub highlighted: bool,
    pub active: bool,
}

/// How a series path should be stroked right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEmphasis {
    Normal,
    /// Highlighting is on and this path is not part of the active group.
    Dimmed,
    /// Shares the active series' selector.
    Highlighted,
    Active,
}

/// Fixed per-character label metrics for headless measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 14.0,
            padding: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoverScene {
    /// Draw order; later entries are on top.
    paths: Vec<PathStyle>,
    /// Draw order; later entries are on top.
    markers: Vec<Marker>,
    vertical_line: Option<GuideLine>,
    horizontal_line: Option<GuideLine>,
    x_label: Option<AxisLabel>,
    y_label: Option<AxisLabel>,
    lines_highlight: bool,
    attributes_highlight: bool,
    metrics: Option<LabelMetrics>,
    revision: u64,
}

impl HoverScene {
    /// A scene that cannot measure labels (sizes count as zero).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label_metrics(metrics: LabelMetrics) -> Self {
        Self {
            metrics: Some(metrics),
            ..Self::default()
        }
    }

    /// Number of mutating calls received so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn paths(&self) -> &[PathStyle] {
        &self.paths
    }

    pub fn path(&self, key: &SeriesKey) -> Option<&PathStyle> {
        self.paths.iter().find(|p| &p.key == key)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, key: &SeriesKey) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.key == key)
    }

    pub fn guide_line(&self, orientation: Orientation) -> Option<&GuideLine> {
        match orientation {
            Orientation::Vertical => self.vertical_line.as_ref(),
            Orientation::Horizontal => self.horizontal_line.as_ref(),
        }
    }

    pub fn axis_label(&self, orientation: Orientation) -> Option<&AxisLabel> {
        match orientation {
            Orientation::Vertical => self.x_label.as_ref(),
            Orientation::Horizontal => self.y_label.as_ref(),
        }
    }

    pub fn layer_highlight(&self, layer: Layer) -> bool {
        match layer {
            Layer::Lines => self.lines_highlight,
            Layer::Attributes => self.attributes_highlight,
        }
    }

    /// The active path's key, if any.
    pub fn active_series(&self) -> Option<&SeriesKey> {
        self.paths.iter().find(|p| p.active).map(|p| &p.key)
    }

    pub fn path_emphasis(&self, key: &SeriesKey) -> PathEmphasis {
        let Some(path) = self.path(key) else {
            return PathEmphasis::Normal;
        };
        if path.active {
            PathEmphasis::Active
        } else if path.highlighted {
            PathEmphasis::Highlighted
        } else if self.lines_highlight && self.paths.iter().any(|p| p.active) {
            PathEmphasis::Dimmed
        } else {
            PathEmphasis::Normal
        }
    }

    /// Nothing transient is shown: no guide lines, labels, highlight flags,
    /// or series/marker styling.
    pub fn is_clear(&self) -> bool {
        self.vertical_line.is_none()
            && self.horizontal_line.is_none()
            && self.x_label.is_none()
            && self.y_label.is_none()
            && !self.lines_highlight
            && !self.attributes_highlight
            && self.paths.iter().all(|p| !p.highlighted && !p.active)
            && self.markers.iter().all(|m| m.state == MarkerState::Normal)
    }

    fn raise_marker(&mut self, key: &SeriesKey) {
        if let Some(i) = self.markers.iter().position(|m| &m.key == key) {
            let m = self.markers.remove(i);
            self.markers.push(m);
        }
    }

    fn raise_paths(&mut self, pred: impl Fn(&PathStyle) -> bool) {
        let (raised, rest): (Vec<_>, Vec<_>) = self.paths.drain(..).partition(|p| pred(p));
        self.paths = rest;
        self.paths.extend(raised);
    }
}

impl HoverRenderer for HoverScene {
    fn set_series(&mut self, paths: &[SeriesPath]) {
        self.revision += 1;
        let old = std::mem::take(&mut self.paths);
        self.paths = paths
            .iter()
            .map(|p| {
                let prev = old.iter().find(|o| o.key == p.key);
                PathStyle {
                    key: p.key.clone(),
                    selector: p.selector.clone(),
                    color: p.color,
                    highlighted: prev.is_some_and(|o| o.highlighted),
                    active: prev.is_some_and(|o| o.active),
                }
            })
            .collect();
    }

    fn set_layer_highlight(&mut self, layer: Layer, on: bool) {
        self.revision += 1;
        match layer {
            Layer::Lines => self.lines_highlight = on,
            Layer::Attributes => self.attributes_highlight = on,
        }
    }

    fn draw_markers(&mut self, circles: &[Circle]) {
        self.revision += 1;
        self.markers
            .retain(|m| circles.iter().any(|c| c.key == m.key));
        for circle in circles {
            match self.markers.iter_mut().find(|m| m.key == circle.key) {
                Some(marker) => {
                    marker.color = circle.color;
                    marker.x = circle.x;
                    marker.y = circle.y;
                    marker.state = MarkerState::Normal;
                }
                None => self.markers.push(Marker {
                    key: circle.key.clone(),
                    color: circle.color,
                    x: circle.x,
                    y: circle.y,
                    state: MarkerState::Normal,
                }),
            }
        }
    }

    fn set_marker_state(&mut self, key: &SeriesKey, state: MarkerState) {
        self.revision += 1;
        if state == MarkerState::Focused {
            for m in &mut self.markers {
                m.state = MarkerState::Normal;
            }
        }
        let Some(marker) = self.markers.iter_mut().find(|m| &m.key == key) else {
            return;
        };
        marker.state = state;
        if state != MarkerState::Normal {
            self.raise_marker(key);
        }
    }

    fn set_active_series(&mut self, key: &SeriesKey) -> bool {
        let Some(selector) = self.path(key).map(|p| p.selector.clone()) else {
            return false;
        };
        self.revision += 1;
        for p in &mut self.paths {
            if p.selector == selector {
                p.highlighted = true;
            }
            if &p.key == key {
                p.active = true;
            }
        }
        self.raise_paths(|p| p.selector == selector);
        self.raise_paths(|p| &p.key == key);
        true
    }

    fn clear_active_series(&mut self, key: &SeriesKey) {
        let Some(selector) = self.path(key).map(|p| p.selector.clone()) else {
            return;
        };
        self.revision += 1;
        for p in &mut self.paths {
            if &p.key == key {
                p.active = false;
            }
            if p.selector == selector {
                p.highlighted = false;
            }
        }
    }

    fn draw_guide_line(&mut self, line: GuideLine) {
        self.revision += 1;
        match line.orientation {
            Orientation::Vertical => self.vertical_line = Some(line),
            Orientation::Horizontal => self.horizontal_line = Some(line),
        }
    }

    fn remove_guide_line(&mut self, orientation: Orientation) {
        self.revision += 1;
        match orientation {
            Orientation::Vertical => self.vertical_line = None,
            Orientation::Horizontal => self.horizontal_line = None,
        }
    }

    fn draw_axis_label(&mut self, label: AxisLabel) {
        self.revision += 1;
        match label.orientation {
            Orientation::Vertical => self.x_label = Some(label),
            Orientation::Horizontal => self.y_label = Some(label),
        }
    }

    fn remove_axis_label(&mut self, orientation: Orientation) {
        self.revision += 1;
        match orientation {
            Orientation::Vertical => self.x_label = None,
            Orientation::Horizontal => self.y_label = None,
        }
    }

    fn measure_label(&self, _orientation: Orientation, text: &str) -> Option<LabelSize> {
        let m = self.metrics?;
        Some(LabelSize::new(
            text.chars().count() as f64 * m.char_width + 2.0 * m.padding,
            m.line_height + m.padding,
        ))
    }

    fn clear_all(&mut self) {
        self.revision += 1;
        self.vertical_line = None;
        self.horizontal_line = None;
        self.x_label = None;
        self.y_label = None;
        self.lines_highlight = false;
        self.attributes_highlight = false;
        for p in &mut self.paths {
            p.highlighted = false;
            p.active = false;
        }
        for m in &mut self.markers {
            m.state = MarkerState::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(key: &str, selector: &str) -> SeriesPath {
        SeriesPath {
            key: key.into(),
            selector: selector.to_string(),
            color: Color32::WHITE,
        }
    }

    fn circle(key: &str, x: f64) -> Circle {
        Circle {
            key: key.into(),
            color: Color32::WHITE,
            x,
            y: 0.0,
            x_value: x,
            y_value: 0.0,
        }
    }

    #[test]
    fn markers_are_diffed_by_key() {
        let mut scene = HoverScene::new();
        scene.draw_markers(&[circle("a", 1.0), circle("b", 2.0)]);
        scene.draw_markers(&[circle("b", 5.0), circle("c", 6.0)]);
        let keys: Vec<&str> = scene.markers().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(scene.marker(&"b".into()).unwrap().x, 5.0);
    }

    #[test]
    fn focused_marker_resets_siblings_active_does_not() {
        let mut scene = HoverScene::new();
        scene.draw_markers(&[circle("a", 1.0), circle("b", 2.0)]);
        scene.set_marker_state(&"a".into(), MarkerState::Active);
        scene.set_marker_state(&"b".into(), MarkerState::Active);
        assert_eq!(scene.marker(&"a".into()).unwrap().state, MarkerState::Active);
        scene.set_marker_state(&"b".into(), MarkerState::Focused);
        assert_eq!(scene.marker(&"a".into()).unwrap().state, MarkerState::Normal);
        assert_eq!(scene.marker(&"b".into()).unwrap().state, MarkerState::Focused);
        assert_eq!(scene.markers().last().unwrap().key.as_str(), "b");
    }

    #[test]
    fn active_series_highlights_its_group_and_raises() {
        let mut scene = HoverScene::new();
        scene.set_series(&[path("a1", "a"), path("b", "b"), path("a2", "a")]);
        assert!(scene.set_active_series(&"a1".into()));
        assert!(scene.path(&"a2".into()).unwrap().highlighted);
        assert!(!scene.path(&"b".into()).unwrap().highlighted);
        assert_eq!(scene.paths().last().unwrap().key.as_str(), "a1");

        scene.clear_active_series(&"a1".into());
        assert!(scene.paths().iter().all(|p| !p.active && !p.highlighted));
    }

    #[test]
    fn unknown_series_is_ignored() {
        let mut scene = HoverScene::new();
        scene.set_series(&[path("a", "a")]);
        let before = scene.revision();
        assert!(!scene.set_active_series(&"missing".into()));
        scene.clear_active_series(&"missing".into());
        assert_eq!(scene.revision(), before);
    }

    #[test]
    fn emphasis_dims_others_only_with_highlight_on() {
        let mut scene = HoverScene::new();
        scene.set_series(&[path("a", "a"), path("b", "b")]);
        scene.set_active_series(&"a".into());
        assert_eq!(scene.path_emphasis(&"b".into()), PathEmphasis::Normal);
        scene.set_layer_highlight(Layer::Lines, true);
        assert_eq!(scene.path_emphasis(&"b".into()), PathEmphasis::Dimmed);
        assert_eq!(scene.path_emphasis(&"a".into()), PathEmphasis::Active);
    }

    #[test]
    fn measurement_unavailable_without_metrics() {
        let scene = HoverScene::new();
        assert!(scene.measure_label(Orientation::Vertical, "12").is_none());
        let scene = HoverScene::with_label_metrics(LabelMetrics::default());
        let size = scene.measure_label(Orientation::Vertical, "12").unwrap();
        assert_eq!(size, LabelSize::new(22.0, 18.0));
    }
}
