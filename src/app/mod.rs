//! Demo window: linked charts sharing one focus group.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`demo_data`]     | Deterministic demo series |
//! | [`linked_charts`] | The eframe app: layout, pointer routing, painting |
//! | [`run`]           | [`run_linked_charts()`] entry point |

pub mod demo_data;
mod linked_charts;
mod run;

pub use linked_charts::{ChartPanel, LinkedChartsApp};
pub use run::run_linked_charts;
