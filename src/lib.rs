//! hoverlink crate root: re-exports and module wiring.
//!
//! Synchronized hover and click-focus for multi-series line charts. Each chart
//! runs a [`HoverEngine`]; charts that belong together join a [`FocusGroup`],
//! which keeps one shared [`FocusedState`] and moves every sibling's crosshair
//! whenever one of them is hovered or focused.
//!
//! - `data`: series, scales, geometry, nearest-sample search, formatting
//! - `render`: the [`HoverRenderer`] seam, a headless scene and the egui layer
//! - `hover`: the per-chart state machine
//! - `sync` / `group`: the sync protocol and the group that applies it
//! - `config` / `logging` / `error`: ambient setup
//! - `app`: an eframe demo window with two linked charts

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod group;
pub mod hover;
pub mod logging;
pub mod render;
pub mod sync;

pub use app::run_linked_charts;
pub use config::{HighlightMode, HoverConfig, LogFormat, LoggingConfig, XAlignment};
pub use data::focus::{ActivePoint, FocusHandle, FocusedState};
pub use data::geometry::{ChartBox, Margin, PixelPos, HOVER_PADDING};
pub use data::scale::{AxisScale, LinearScale, LogScale};
pub use data::series::{Circle, Series, SeriesKey};
pub use data::value_formatter::ValueFormatter;
pub use error::{HoverError, Result};
pub use group::FocusGroup;
pub use hover::{HoverEngine, PointerEvent, RedrawPolicy};
pub use logging::init_logging;
pub use render::{EguiHoverLayer, HoverRenderer, HoverScene};
pub use sync::{ChannelSink, SyncEnvelope, SyncMessage, SyncSink};
