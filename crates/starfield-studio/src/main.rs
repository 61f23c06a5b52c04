use anyhow::{Context, Result};
use starfield_engine::device::GpuInit;
use starfield_engine::logging::{init_logging, LoggingConfig};
use starfield_engine::window::{Runtime, RuntimeConfig};
use starfield_widget::{StarfieldApp, StarfieldConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = StarfieldConfig::from_env().context("invalid starfield configuration")?;
    log::info!(
        "{} stars, shaders {} + {}, seed {:?}",
        config.star_count,
        config.vertex_shader,
        config.fragment_shader,
        config.seed
    );

    let runtime = RuntimeConfig {
        title: "Starfield".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(runtime, GpuInit::default(), StarfieldApp::new(config))
}
