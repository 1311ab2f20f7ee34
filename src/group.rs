//! A synchronized group of chart instances.
//!
//! The group owns the shared [`FocusedState`] and the receiving end of every
//! member's sync channel. Members only read the state; [`FocusGroup::process_sync`]
//! applies their messages in send order and fans them out to the siblings.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender};

use crate::config::HoverConfig;
use crate::data::focus::{FocusHandle, FocusedState};
use crate::data::geometry::ChartBox;
use crate::data::scale::AxisScale;
use crate::hover::{HoverEngine, PointerEvent};
use crate::render::HoverRenderer;
use crate::sync::{ChannelSink, SyncEnvelope, SyncMessage};

pub struct FocusGroup<R: HoverRenderer> {
    state: Rc<RefCell<FocusedState>>,
    charts: Vec<HoverEngine<R>>,
    tx: Sender<SyncEnvelope>,
    rx: Receiver<SyncEnvelope>,
    config: HoverConfig,
}

impl<R: HoverRenderer> Default for FocusGroup<R> {
    fn default() -> Self {
        Self::new(HoverConfig::default())
    }
}

impl<R: HoverRenderer> FocusGroup<R> {
    pub fn new(config: HoverConfig) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            state: Rc::new(RefCell::new(FocusedState::default())),
            charts: Vec::new(),
            tx,
            rx,
            config,
        }
    }

    /// Create a member chart wired to the group's state and channel.
    /// Returns its index.
    pub fn add_chart(
        &mut self,
        chart: ChartBox,
        x_scale: impl AxisScale + 'static,
        y_scale: impl AxisScale + 'static,
        renderer: R,
    ) -> usize {
        let index = self.charts.len();
        let engine = HoverEngine::new(index, chart, x_scale, y_scale, renderer, self.focus_handle())
            .with_config(&self.config)
            .with_sink(ChannelSink::new(self.tx.clone()));
        self.charts.push(engine);
        tracing::debug!(chart = index, "chart added to focus group");
        index
    }

    pub fn focus_handle(&self) -> FocusHandle {
        FocusHandle::new(self.state.clone())
    }

    pub fn state(&self) -> FocusedState {
        self.state.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn chart(&self, index: usize) -> Option<&HoverEngine<R>> {
        self.charts.get(index)
    }

    pub fn chart_mut(&mut self, index: usize) -> Option<&mut HoverEngine<R>> {
        self.charts.get_mut(index)
    }

    pub fn charts(&self) -> &[HoverEngine<R>] {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut [HoverEngine<R>] {
        &mut self.charts
    }

    /// Route a pointer event to member `index` and apply what it sent.
    pub fn dispatch(&mut self, index: usize, event: PointerEvent) {
        let Some(chart) = self.charts.get_mut(index) else {
            tracing::warn!(chart = index, "event for unknown chart");
            return;
        };
        chart.handle_event(event);
        self.process_sync();
    }

    /// Run [`HoverEngine::init`] on every member, then apply the results.
    pub fn init_all(&mut self) {
        for chart in &mut self.charts {
            chart.init();
        }
        self.process_sync();
    }

    /// Apply every pending sync message. Returns how many were applied.
    ///
    /// `Clear` resets the shared state and clears every member but the
    /// sender. An active-point update makes the sender the owner, stores the
    /// point and lock flag, and moves every other member to the point's x.
    pub fn process_sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            applied += 1;
            let source = envelope.source;
            match envelope.message {
                SyncMessage::Clear => {
                    tracing::trace!(source, "sync: clear");
                    self.state.borrow_mut().reset();
                    for chart in self.charts.iter_mut().filter(|c| c.index() != source) {
                        chart.clear_hover_attributes();
                    }
                }
                SyncMessage::ActivePointUpdate {
                    point,
                    focused_active,
                } => {
                    let x = point.x_data;
                    tracing::trace!(source, key = %point.key, x, ?focused_active, "sync: active point");
                    {
                        let mut state = self.state.borrow_mut();
                        state.chart_index = Some(source);
                        state.active = focused_active.unwrap_or(false);
                        state.x_step = Some(x);
                        state.active_point = Some(point);
                    }
                    for chart in self.charts.iter_mut().filter(|c| c.index() != source) {
                        chart.update_hover_attributes(x);
                    }
                }
            }
        }
        applied
    }
}
