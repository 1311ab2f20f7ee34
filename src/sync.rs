//! Outbound sync protocol between chart instances and their group.
//!
//! Every chart instance may carry one [`SyncSink`]. Whenever local
//! interaction changes what the chart shows, the instance first renders its
//! own result and then hands a [`SyncEnvelope`] to the sink. The sink is the
//! only path through which one instance can influence its siblings; the
//! shared [`FocusedState`](crate::data::focus::FocusedState) itself is written
//! by the receiver (see [`FocusGroup`](crate::group::FocusGroup)).

use std::sync::mpsc::{Receiver, Sender};

use crate::data::focus::ActivePoint;

/// What an instance broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMessage {
    /// Drop any hover/focus state, releasing a foreign lock.
    Clear,
    /// A new active point. `focused_active` is `Some(true)` when the
    /// interaction claims the focus lock, `Some(false)` when it explicitly
    /// releases it and `None` for plain hover.
    ActivePointUpdate {
        point: ActivePoint,
        focused_active: Option<bool>,
    },
}

/// A message tagged with the index of the instance that sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncEnvelope {
    pub source: usize,
    pub message: SyncMessage,
}

/// Receiver side of the sync protocol, owned by a chart instance.
pub trait SyncSink {
    fn sync(&mut self, envelope: SyncEnvelope);
}

impl<F> SyncSink for F
where
    F: FnMut(SyncEnvelope),
{
    fn sync(&mut self, envelope: SyncEnvelope) {
        self(envelope)
    }
}

/// Sink forwarding envelopes over an mpsc channel.
///
/// A closed channel is ignored: a missed sync is not worth failing pointer
/// handling for, and the next event re-derives everything.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<SyncEnvelope>,
}

impl ChannelSink {
    pub fn new(tx: Sender<SyncEnvelope>) -> Self {
        Self { tx }
    }
}

impl SyncSink for ChannelSink {
    fn sync(&mut self, envelope: SyncEnvelope) {
        if self.tx.send(envelope).is_err() {
            tracing::debug!("sync receiver dropped; message discarded");
        }
    }
}

/// Create a connected [`ChannelSink`] / receiver pair.
pub fn sync_channel() -> (ChannelSink, Receiver<SyncEnvelope>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (ChannelSink::new(tx), rx)
}
