use hoverlink::{init_logging, run_linked_charts, HoverConfig, LoggingConfig};

fn main() -> eframe::Result<()> {
    // optional first argument: path to a YAML or JSON config
    let loaded = std::env::args().nth(1).map(|path| {
        HoverConfig::load_from_path(&path).and_then(|cfg| cfg.validate().map(|_| cfg))
    });
    let cfg = match loaded {
        Some(Ok(cfg)) => {
            init_logging(&cfg.logging);
            cfg
        }
        Some(Err(err)) => {
            init_logging(&LoggingConfig::default());
            tracing::error!(%err, "invalid config, using defaults");
            HoverConfig::default()
        }
        None => {
            let cfg = HoverConfig::default();
            init_logging(&cfg.logging);
            cfg
        }
    };
    run_linked_charts(cfg)
}
