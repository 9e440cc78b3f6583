use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use vantage::{AppConfig, SceneSlot};

/// Two-scene billboard viewer. Click a billboard to move to the other scene.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Model shown in the first scene (.glb, .gltf or .stl)
    #[arg(long)]
    first_model: Option<PathBuf>,

    /// Model shown in the second scene
    #[arg(long)]
    second_model: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Transition duration in milliseconds
    #[arg(long, default_value_t = 2000)]
    duration_ms: u64,
}

impl Args {
    fn into_config(self) -> AppConfig {
        let mut config = AppConfig::new()
            .size(self.width, self.height)
            .transition_duration(Duration::from_millis(self.duration_ms));

        if let Some(path) = self.first_model {
            config = config.model(SceneSlot::First, path);
        }
        if let Some(path) = self.second_model {
            config = config.model(SceneSlot::Second, path);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();
    log::debug!("starting with {config:?}");

    vantage::run(config).context("viewer exited with an error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "vantage",
            "--second-model",
            "b.stl",
            "--width",
            "1024",
            "--duration-ms",
            "500",
        ]);
        let config = args.into_config();

        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.transition.duration, Duration::from_millis(500));
        assert_eq!(
            config.scene_config(SceneSlot::First).model,
            PathBuf::from("models/BillboardModel.glb")
        );
        assert_eq!(
            config.scene_config(SceneSlot::Second).model,
            PathBuf::from("b.stl")
        );
    }
}
