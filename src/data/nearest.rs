//! Nearest-sample search and closest-circle resolution.
//!
//! Both run on every pointer move, so the per-series search is a binary search
//! (O(log n)) rather than a scan.

use super::geometry::PixelPos;
use super::scale::AxisScale;
use super::series::{Circle, Series};

/// Index of the value in ascending `values` closest to `x`.
///
/// When `x` lies exactly halfway between two samples the right-hand one wins.
/// Returns `None` for an empty slice.
pub fn bisect_center(values: &[f64], x: f64) -> Option<usize> {
    let last = values.len().checked_sub(1)?;
    // first index in [0, last] whose value is >= x
    let i = values[..last].partition_point(|v| *v < x);
    if i > 0 && values[i - 1] - x > -(values[i] - x) {
        Some(i - 1)
    } else {
        Some(i)
    }
}

/// For a plot-local pixel `mouse_x`, the nearest sample of every series
/// projected back to plot pixels. Empty series yield no circle.
pub fn nearest_per_series(
    series: &[Series],
    mouse_x: f64,
    x_scale: &dyn AxisScale,
    y_scale: &dyn AxisScale,
) -> Vec<Circle> {
    let x_value = x_scale.invert(mouse_x);
    series
        .iter()
        .filter_map(|s| {
            let index = bisect_center(&s.x_values, x_value)?;
            let [x, y] = s.sample(index)?;
            Some(Circle {
                key: s.key.clone(),
                color: s.color,
                x: x_scale.apply(x),
                y: y_scale.apply(y),
                x_value: x,
                y_value: y,
            })
        })
        .collect()
}

/// The circle closest to `(mouse_x, mouse_y)` by Euclidean pixel distance.
///
/// Exact ties go to the lexicographically smallest key, so the result does not
/// depend on input order. Circles whose distance is not finite are ignored.
pub fn closest_circle(circles: &[Circle], mouse_x: f64, mouse_y: f64) -> Option<&Circle> {
    let mouse = PixelPos::new(mouse_x, mouse_y);
    let mut best: Option<(&Circle, f64)> = None;
    for circle in circles {
        let r = PixelPos::new(circle.x, circle.y).distance(mouse);
        if !r.is_finite() {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, min_r)) => r < min_r || (r == min_r && circle.key < current.key),
        };
        if better {
            best = Some((circle, r));
        }
    }
    best.map(|(circle, _)| circle)
}
