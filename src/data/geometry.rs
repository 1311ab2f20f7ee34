//! Chart geometry and pointer → plot coordinate mapping.
//!
//! Three coordinate spaces are involved:
//! - **chart** space: pixels relative to the chart's top-left corner (pointer
//!   events arrive in this space),
//! - **plot** space: chart space minus the margins, origin at the plot's
//!   top-left corner (scales map into this space),
//! - **page** space: absolute viewport pixels (chart origin + chart space).

use serde::{Deserialize, Serialize};

use super::scale::AxisScale;

/// Tolerance (pixels) around the plot rectangle inside which the pointer still
/// counts as hovering the plot.
pub const HOVER_PADDING: f64 = 5.0;

/// A pixel position. The coordinate space depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    pub const ZERO: PixelPos = PixelPos { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: PixelPos) -> f64 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f64; 2]> for PixelPos {
    fn from(p: [f64; 2]) -> Self {
        PixelPos { x: p[0], y: p[1] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Outer chart box: full size plus the margins reserved for axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl ChartBox {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// The inner plot rectangle.
    pub fn plot_box(&self) -> PlotBox {
        PlotBox {
            width: (self.width - self.margin.left - self.margin.right).max(0.0),
            height: (self.height - self.margin.top - self.margin.bottom).max(0.0),
        }
    }

    /// Whether a chart-space position lies inside the plot rectangle expanded
    /// by [`HOVER_PADDING`] on each side. Edges are exclusive.
    pub fn is_inside_plot(&self, x: f64, y: f64) -> bool {
        let m = &self.margin;
        x > m.left - HOVER_PADDING
            && x < self.width - m.right + HOVER_PADDING
            && y > m.top - HOVER_PADDING
            && y < self.height - m.bottom + HOVER_PADDING
    }

    /// Plot-local position → chart space.
    pub fn plot_to_chart(&self, pos: PixelPos) -> PixelPos {
        PixelPos::new(pos.x + self.margin.left, pos.y + self.margin.top)
    }
}

/// Inner plot rectangle size (origin at the plot's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotBox {
    pub width: f64,
    pub height: f64,
}

/// Geometry of one guide-line segment in plot space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLineData {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Subtract the chart margins from a chart-space pointer position.
pub fn map_pointer_to_plot(pointer: PixelPos, margin: &Margin) -> PixelPos {
    PixelPos::new(pointer.x - margin.left, pointer.y - margin.top)
}

/// A pointer position resolved into plot pixels and data values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotCoordinates {
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub x_value: f64,
    pub y_value: f64,
}

impl PlotCoordinates {
    pub fn from_pointer(
        pointer: PixelPos,
        margin: &Margin,
        x_scale: &dyn AxisScale,
        y_scale: &dyn AxisScale,
    ) -> Self {
        let local = map_pointer_to_plot(pointer, margin);
        Self {
            mouse_x: local.x,
            mouse_y: local.y,
            x_value: x_scale.invert(local.x),
            y_value: y_scale.invert(local.y),
        }
    }
}

/// Clamp `v` into `[lo, hi]`. Unlike `f64::clamp` this never panics when the
/// bounds are inverted (degenerate, zero-sized plots); `lo` wins then.
pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
