//! Placement of guide lines and axis labels.
//!
//! Pure geometry so the clamping rules can be tested without a renderer.

use crate::data::geometry::{clamp, AxisLineData, ChartBox, PlotBox};

use super::{LabelRect, LabelSize, Orientation};

/// Gap (pixels) kept between a y-axis label and the chart's left border.
pub const Y_LABEL_INSET: f64 = 5.0;

/// Full-length guide line at `position` (plot space), clamped to the plot.
///
/// `Vertical` lines mark an x position, `Horizontal` lines a y position.
pub fn guide_line(orientation: Orientation, position: f64, plot: PlotBox) -> AxisLineData {
    match orientation {
        Orientation::Vertical => {
            let x = clamp(position, 0.0, plot.width);
            AxisLineData {
                x1: x,
                y1: 0.0,
                x2: x,
                y2: plot.height,
            }
        }
        Orientation::Horizontal => {
            let y = clamp(position, 0.0, plot.height);
            AxisLineData {
                x1: 0.0,
                y1: y,
                x2: plot.width,
                y2: y,
            }
        }
    }
}

/// Rectangle (chart space) of the x-axis value label for plot-space `x`.
///
/// The label sits just below the plot, centered on `x`, and is shifted (not
/// clipped) so it stays between the plot's left and right edges. Labels wider
/// than the plot are shrunk to the plot width.
pub fn x_axis_label(chart: &ChartBox, x: f64, size: LabelSize) -> LabelRect {
    let m = &chart.margin;
    let plot = chart.plot_box();
    let axis_left = m.left - 1.0;
    let axis_right = chart.width - m.right + 1.0;
    let width = size.width.min(plot.width);
    let half = width / 2.0;

    let center = if x - half < 0.0 {
        axis_left + half
    } else if x + axis_left + half > axis_right {
        axis_right - half
    } else {
        x + axis_left
    };
    LabelRect {
        left: center - half,
        top: chart.height - m.bottom + 1.0,
        width,
        height: size.height,
    }
}

/// Rectangle (chart space) of the y-axis value label for plot-space `y`.
///
/// The label is right-aligned against the plot's left edge, vertically
/// centered on `y` and shifted to stay between the plot's top and bottom
/// edges. Its width never exceeds the left margin minus [`Y_LABEL_INSET`].
pub fn y_axis_label(chart: &ChartBox, y: f64, size: LabelSize) -> LabelRect {
    let m = &chart.margin;
    let axis_top = m.top - 1.0;
    let axis_bottom = chart.height - m.bottom + 1.0;
    let width = size.width.min((m.left - Y_LABEL_INSET).max(0.0));
    let half = size.height / 2.0;

    let center = if y - half < 0.0 {
        axis_top + half
    } else if y + axis_top + half > axis_bottom {
        axis_bottom - half
    } else {
        y + axis_top
    };
    LabelRect {
        left: m.left - width,
        top: center - half,
        width,
        height: size.height,
    }
}

/// Dispatch on orientation: `Vertical` guides carry the x label.
pub fn axis_label(
    chart: &ChartBox,
    orientation: Orientation,
    position: f64,
    size: LabelSize,
) -> LabelRect {
    match orientation {
        Orientation::Vertical => x_axis_label(chart, position, size),
        Orientation::Horizontal => y_axis_label(chart, position, size),
    }
}
