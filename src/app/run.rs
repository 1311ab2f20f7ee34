//! Entry point for the linked-charts demo window.

use eframe::egui;

use crate::config::HoverConfig;

use super::demo_data::demo_charts;
use super::linked_charts::LinkedChartsApp;

const DEMO_STEPS: usize = 240;

/// Open a native window with the demo charts and block until it is closed.
pub fn run_linked_charts(cfg: HoverConfig) -> eframe::Result<()> {
    let charts = match demo_charts(DEMO_STEPS) {
        Ok(charts) => charts,
        Err(err) => {
            tracing::error!(%err, "failed to build demo data");
            Vec::new()
        }
    };
    tracing::info!(charts = charts.len(), "starting linked charts demo");
    let app = LinkedChartsApp::new(cfg, charts);

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1000.0, 720.0)),
        ..Default::default()
    };
    eframe::run_native("hoverlink", opts, Box::new(|_cc| Ok(Box::new(app))))
}
