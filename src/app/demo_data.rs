//! Synthetic training-curve style series for the demo window.

use crate::data::series::{alloc_color, Series};
use crate::error::Result;

/// A titled chart's worth of series.
#[derive(Debug, Clone)]
pub struct DemoChart {
    pub title: String,
    pub series: Vec<Series>,
}

/// Two charts over the same step axis: loss and accuracy of three runs.
///
/// Each run's loss is split into a train and a validation path sharing the
/// run's selector, so highlighting one shows its sibling too. Metric names
/// (`train`, `val`, `acc`) group the same curve across runs.
pub fn demo_charts(steps: usize) -> Result<Vec<DemoChart>> {
    let xs: Vec<f64> = (0..steps).map(|i| i as f64).collect();
    let runs = [("run-a", 0.9, 0.0), ("run-b", 1.2, 1.3), ("run-c", 0.7, 2.1)];

    let mut loss = Vec::new();
    let mut accuracy = Vec::new();
    for (i, (run, rate, phase)) in runs.iter().enumerate() {
        let color = alloc_color(i);
        let train: Vec<f64> = xs.iter().map(|&x| decay(x, *rate, *phase, 0.03)).collect();
        let val: Vec<f64> = xs
            .iter()
            .map(|&x| decay(x, *rate, *phase, 0.05) + 0.08)
            .collect();
        let acc: Vec<f64> = train.iter().map(|l| (1.0 - l / 3.0).clamp(0.0, 1.0)).collect();

        loss.push(
            Series::new(format!("{run}/train"), color, xs.clone(), train)?
                .with_selector(*run)
                .with_metric("train"),
        );
        loss.push(
            Series::new(format!("{run}/val"), color.gamma_multiply(0.6), xs.clone(), val)?
                .with_selector(*run)
                .with_metric("val"),
        );
        accuracy.push(
            Series::new(format!("{run}/acc"), color, xs.clone(), acc)?
                .with_selector(*run)
                .with_metric("acc"),
        );
    }

    Ok(vec![
        DemoChart {
            title: "loss".to_string(),
            series: loss,
        },
        DemoChart {
            title: "accuracy".to_string(),
            series: accuracy,
        },
    ])
}

fn decay(x: f64, rate: f64, phase: f64, noise: f64) -> f64 {
    3.0 * (-x * rate / 60.0).exp() + noise * (x * 0.37 + phase).sin()
}

/// `(min, max)` over every y value, padded by 5%. `(0, 1)` when empty.
pub fn y_extent(series: &[Series]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.y_values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-9);
    (lo - pad, hi + pad)
}

/// `(min, max)` over every x value. `(0, 1)` when empty.
pub fn x_extent(series: &[Series]) -> (f64, f64) {
    let lo = series.iter().filter_map(|s| s.x_values.first()).fold(f64::INFINITY, |a, &b| a.min(b));
    let hi = series.iter().filter_map(|s| s.x_values.last()).fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    if lo > hi {
        (0.0, 1.0)
    } else {
        (lo, hi)
    }
}
