//! Render layer: the drawing operations the hover engine needs.
//!
//! The engine talks to a [`HoverRenderer`] only, so geometry, search and the
//! state machine run the same against the headless [`HoverScene`] and the
//! egui-backed [`EguiHoverLayer`].

mod egui_layer;
pub mod layout;
mod scene;

pub use egui_layer::{series_stroke, EguiHoverLayer};
pub use scene::{HoverScene, LabelMetrics, Marker, PathEmphasis, PathStyle};

use egui::Color32;

use crate::data::geometry::AxisLineData;
use crate::data::series::{Circle, SeriesKey};

/// Guide-line / axis-label orientation. A `Vertical` guide marks an x
/// position and carries the x-axis label; a `Horizontal` one marks y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Visual state of a point marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Normal,
    /// The hovered marker; enlarged and raised.
    Active,
    /// The click-focused marker; every other marker is reset first.
    Focused,
}

/// Layers carrying a global "highlight" toggle that dims non-active items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Lines,
    Attributes,
}

/// One drawn series path as the renderer knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub key: SeriesKey,
    /// Grouping identity shared by all fragments of one logical series.
    pub selector: String,
    pub color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub orientation: Orientation,
    /// Plot space.
    pub line: AxisLineData,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

impl LabelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Label rectangle in chart space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub orientation: Orientation,
    pub text: String,
    pub rect: LabelRect,
}

/// Drawing surface of one chart instance.
///
/// Implementations own their surface exclusively. Every `draw_*` call
/// replaces the previous item of the same identity (key or orientation);
/// nothing is ever duplicated.
pub trait HoverRenderer {
    /// Paths currently drawn for the chart's series (called at draw time).
    fn set_series(&mut self, paths: &[SeriesPath]);

    /// Toggle the global highlight flag of a layer.
    fn set_layer_highlight(&mut self, layer: Layer, on: bool);

    /// Sync point markers with `circles`, matched by key. All markers come
    /// out in [`MarkerState::Normal`].
    fn draw_markers(&mut self, circles: &[Circle]);

    /// `Focused` resets every other marker to `Normal` first; `Active` leaves
    /// siblings alone. Unknown keys are ignored.
    fn set_marker_state(&mut self, key: &SeriesKey, state: MarkerState);

    /// Highlight every path sharing `key`'s selector and mark `key` active
    /// and raised. Returns `false` (and changes nothing) for unknown keys.
    fn set_active_series(&mut self, key: &SeriesKey) -> bool;

    /// Undo exactly what [`set_active_series`](Self::set_active_series) did.
    fn clear_active_series(&mut self, key: &SeriesKey);

    fn draw_guide_line(&mut self, line: GuideLine);

    fn remove_guide_line(&mut self, orientation: Orientation);

    fn draw_axis_label(&mut self, label: AxisLabel);

    fn remove_axis_label(&mut self, orientation: Orientation);

    /// Rendered size of `text` as a label, `None` when it cannot be measured
    /// (callers treat that as zero).
    fn measure_label(&self, orientation: Orientation, text: &str) -> Option<LabelSize>;

    /// Remove guide lines and labels, reset marker and series styling and
    /// both layer highlight flags.
    fn clear_all(&mut self);
}
