//! Invertible axis scales mapping data values to plot-local pixels.
//!
//! The host owns domain computation; the engine only applies and inverts the
//! scales it is given and rebinds them through `update_scales` after a resize
//! or zoom.

use std::fmt::Debug;

/// A pixel ↔ data mapping for one axis.
pub trait AxisScale: Debug {
    /// Data value → plot-local pixel.
    fn apply(&self, value: f64) -> f64;
    /// Plot-local pixel → data value.
    fn invert(&self, pixel: f64) -> f64;
    /// Data extent `(start, end)` as configured by the host.
    fn domain(&self) -> (f64, f64);
    /// Pixel extent `(start, end)`; `start` may exceed `end` for flipped axes.
    fn range(&self) -> (f64, f64);

    /// Pixel extent ordered as `(min, max)`.
    fn range_extent(&self) -> (f64, f64) {
        let (a, b) = self.range();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Linear mapping of `domain` onto `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }
}

impl AxisScale for LinearScale {
    fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) * 0.5;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Base-10 logarithmic mapping. Non-positive values map to `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    fn log_domain(&self) -> (f64, f64) {
        (self.domain.0.log10(), self.domain.1.log10())
    }
}

impl AxisScale for LogScale {
    fn apply(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return f64::NAN;
        }
        let (l0, l1) = self.log_domain();
        let (r0, r1) = self.range;
        if l1 == l0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value.log10() - l0) / (l1 - l0) * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let (l0, l1) = self.log_domain();
        let (r0, r1) = self.range;
        if r1 == r0 {
            return 10f64.powf((l0 + l1) * 0.5);
        }
        10f64.powf(l0 + (pixel - r0) / (r1 - r0) * (l1 - l0))
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}
