//! Focus state shared by a synchronized group of chart instances.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::series::SeriesKey;

/// The resolved result of one interaction, as rendered and broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePoint {
    pub key: SeriesKey,
    /// Formatted x value.
    pub x_value: String,
    /// Formatted y value.
    pub y_value: String,
    /// Raw data-space x of the sample.
    pub x_data: f64,
    /// Raw data-space y of the sample.
    pub y_data: f64,
    /// Plot-local pixel position.
    pub x_pos: f64,
    pub y_pos: f64,
    /// Absolute viewport position.
    pub page_x: f64,
    pub page_y: f64,
    pub chart_index: usize,
}

/// Interaction state of a chart group.
///
/// `active == true` means `chart_index` holds a click-locked focus; otherwise
/// `chart_index` is merely the instance that produced the last hover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusedState {
    pub chart_index: Option<usize>,
    pub active: bool,
    /// Last known data-space x position.
    pub x_step: Option<f64>,
    pub active_point: Option<ActivePoint>,
}

impl FocusedState {
    /// Whether `index` is the owner of this state (locked or not).
    pub fn is_owned_by(&self, index: usize) -> bool {
        self.chart_index == Some(index)
    }

    /// Whether some instance holds a click lock.
    pub fn is_locked(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        *self = FocusedState::default();
    }
}

/// Read-only handle to a group's [`FocusedState`].
///
/// Chart instances get a handle; only the owning group mutates the state.
#[derive(Debug, Clone)]
pub struct FocusHandle {
    inner: Rc<RefCell<FocusedState>>,
}

impl FocusHandle {
    pub(crate) fn new(inner: Rc<RefCell<FocusedState>>) -> Self {
        Self { inner }
    }

    /// A handle to private state nobody else writes; for charts used outside
    /// a group.
    pub fn detached() -> Self {
        Self::new(Rc::new(RefCell::new(FocusedState::default())))
    }

    pub fn borrow(&self) -> Ref<'_, FocusedState> {
        self.inner.borrow()
    }

    pub fn snapshot(&self) -> FocusedState {
        self.inner.borrow().clone()
    }

    pub fn is_locked(&self) -> bool {
        self.inner.borrow().active
    }

    pub fn chart_index(&self) -> Option<usize> {
        self.inner.borrow().chart_index
    }

    pub fn x_step(&self) -> Option<f64> {
        self.inner.borrow().x_step
    }
}
