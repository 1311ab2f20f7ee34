//! Series: one named, colored, ordered sequence of (x, y) samples.

use std::fmt;

use egui::Color32;

use crate::config::HighlightMode;
use crate::error::{HoverError, Result};

/// Unique identifier of a plotted series.
///
/// Ordering is lexicographic on the underlying string; the closest-circle
/// resolver relies on it to break exact distance ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey(pub String);

impl SeriesKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesKey {
    fn from(s: &str) -> Self {
        SeriesKey(s.to_string())
    }
}

impl From<String> for SeriesKey {
    fn from(s: String) -> Self {
        SeriesKey(s)
    }
}

/// A series as supplied by the host at draw time.
///
/// `x_values` must be sorted ascending; the nearest-sample search is a binary
/// search and silently returns wrong neighbours on unsorted input.
#[derive(Debug, Clone)]
pub struct Series {
    pub key: SeriesKey,
    pub color: Color32,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    /// Grouping identity shared by every path fragment of one logical series.
    /// `None` means the series forms its own group.
    pub selector: Option<String>,
    /// Name of the measured quantity (`"loss"`, `"val/loss"`). Groups paths
    /// across runs under [`HighlightMode::Metric`](crate::config::HighlightMode).
    pub metric: Option<String>,
}

impl Series {
    /// Build a series, rejecting mismatched x/y lengths.
    pub fn new(
        key: impl Into<SeriesKey>,
        color: Color32,
        x_values: Vec<f64>,
        y_values: Vec<f64>,
    ) -> Result<Self> {
        let key = key.into();
        if x_values.len() != y_values.len() {
            return Err(HoverError::SeriesLength {
                key: key.0,
                x_len: x_values.len(),
                y_len: y_values.len(),
            });
        }
        debug_assert!(
            x_values.windows(2).all(|w| w[0] <= w[1]),
            "series x values must be sorted ascending"
        );
        Ok(Self {
            key,
            color,
            x_values,
            y_values,
            selector: None,
            metric: None,
        })
    }

    /// Attach a grouping selector (builder style).
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Grouping identity used for "highlighted" styling.
    pub fn group(&self) -> &str {
        self.selector.as_deref().unwrap_or(self.key.as_str())
    }

    /// Grouping identity under `mode`: the selector, or the metric name for
    /// [`HighlightMode::Metric`]. Falls back to the key.
    pub fn highlight_group(&self, mode: HighlightMode) -> &str {
        match mode {
            HighlightMode::Metric => self.metric.as_deref().unwrap_or(self.key.as_str()),
            HighlightMode::Off | HighlightMode::Series => self.group(),
        }
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.x_values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Sample at `index` as `[x, y]`.
    pub fn sample(&self, index: usize) -> Option<[f64; 2]> {
        Some([*self.x_values.get(index)?, *self.y_values.get(index)?])
    }
}

/// The projected nearest sample of one series.
///
/// Recomputed on every query and never stored beyond the current draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub key: SeriesKey,
    pub color: Color32,
    /// Plot-local pixels.
    pub x: f64,
    pub y: f64,
    /// The sample's raw data values, kept so labels never show a value that
    /// went through a lossy pixel round trip.
    pub x_value: f64,
    pub y_value: f64,
}

/// Allocate a distinct color for the given series index.
pub fn alloc_color(index: usize) -> Color32 {
    const PALETTE: [Color32; 10] = [
        Color32::from_rgb(31, 119, 180),
        Color32::from_rgb(255, 127, 14),
        Color32::from_rgb(44, 160, 44),
        Color32::from_rgb(214, 39, 40),
        Color32::from_rgb(148, 103, 189),
        Color32::from_rgb(140, 86, 75),
        Color32::from_rgb(227, 119, 194),
        Color32::from_rgb(127, 127, 127),
        Color32::from_rgb(188, 189, 34),
        Color32::from_rgb(23, 190, 207),
    ];
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Series::new("a", Color32::RED, vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, HoverError::SeriesLength { x_len: 2, y_len: 1, .. }));
    }

    #[test]
    fn group_defaults_to_key() {
        let s = Series::new("loss", Color32::RED, vec![0.0], vec![1.0]).unwrap();
        assert_eq!(s.group(), "loss");
        let s = s.with_selector("run-1");
        assert_eq!(s.group(), "run-1");
    }

    #[test]
    fn highlight_group_follows_mode() {
        let s = Series::new("run-1/loss", Color32::RED, vec![0.0], vec![1.0])
            .unwrap()
            .with_selector("run-1");
        assert_eq!(s.highlight_group(HighlightMode::Metric), "run-1/loss");
        let s = s.with_metric("loss");
        assert_eq!(s.highlight_group(HighlightMode::Series), "run-1");
        assert_eq!(s.highlight_group(HighlightMode::Metric), "loss");
    }

    #[test]
    fn keys_order_lexicographically() {
        assert!(SeriesKey::from("S1") < SeriesKey::from("S2"));
        assert!(SeriesKey::from("S10") < SeriesKey::from("S2"));
    }
}
