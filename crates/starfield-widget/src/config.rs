use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use starfield_engine::coords::ColorRgba;

use crate::assets::ShaderAsset;
use crate::geometry::DEFAULT_QUAD_SCALE;
use crate::particles::DriftParams;

/// Directory holding `vshader.wgsl` / `fshader.wgsl` overrides.
pub const SHADER_DIR_ENV: &str = "STARFIELD_SHADER_DIR";
/// Fixed seed for the star generator.
pub const SEED_ENV: &str = "STARFIELD_SEED";

/// Starfield widget configuration.
#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    pub star_count: usize,

    /// Multiplier applied to every quad vertex component.
    pub quad_scale: f32,

    pub drift: DriftParams,
    pub clear_color: ColorRgba,

    pub vertex_shader: ShaderAsset,
    pub fragment_shader: ShaderAsset,

    /// `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 5000,
            quad_scale: DEFAULT_QUAD_SCALE,
            drift: DriftParams::default(),
            clear_color: ColorRgba::black(),
            vertex_shader: ShaderAsset::builtin_vertex(),
            fragment_shader: ShaderAsset::builtin_fragment(),
            seed: None,
        }
    }
}

impl StarfieldConfig {
    /// Defaults plus `STARFIELD_SHADER_DIR` / `STARFIELD_SEED` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(SHADER_DIR_ENV) {
            let (vs, fs) = ShaderAsset::pair_in_dir(&PathBuf::from(dir));
            self.vertex_shader = vs;
            self.fragment_shader = fs;
        }

        if let Some(seed) = lookup(SEED_ENV) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{SEED_ENV} must be an unsigned integer, got {seed:?}"))?;
            self.seed = Some(seed);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.quad_scale.is_finite() && self.quad_scale > 0.0,
            "quad_scale must be positive, got {}",
            self.quad_scale
        );
        anyhow::ensure!(
            self.drift.divisor.is_finite() && self.drift.divisor > 0.0,
            "drift divisor must be positive, got {}",
            self.drift.divisor
        );
        let r = &self.drift.spawn_radius;
        anyhow::ensure!(
            r.start >= 0.0 && r.start < r.end && r.end.is_finite(),
            "spawn radius must be a non-empty range of non-negative values, got {r:?}"
        );
        anyhow::ensure!(self.clear_color.is_finite(), "clear color must be finite");
        Ok(())
    }

    /// Star generator for this configuration.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
