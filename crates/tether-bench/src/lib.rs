//! Benchmark profiles for the Tether coupling adapter.
//!
//! - [`plate_profile`]: 100x100 plate (10K nodes), default diffusivity
//! - [`stress_profile`]: 316x316 plate (~100K nodes)
//! - [`initialized`]: an adapter already past `initialize`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tether_adapter::{Adapter, AdapterError, ModelAdapter};
use tether_models::{Diffusion, DiffusionConfig};

/// 100x100 plate with a fixed seed.
pub fn plate_profile(seed: u64) -> DiffusionConfig {
    DiffusionConfig {
        shape: [100, 100],
        seed,
        ..DiffusionConfig::default()
    }
}

/// 316x316 plate, ten times the node count of [`plate_profile`].
pub fn stress_profile(seed: u64) -> DiffusionConfig {
    DiffusionConfig {
        shape: [316, 316],
        seed,
        ..DiffusionConfig::default()
    }
}

/// Build and initialize a diffusion adapter from `config`.
pub fn initialized(config: DiffusionConfig) -> Result<Adapter<Diffusion>, AdapterError> {
    let mut adapter = Adapter::new();
    adapter.initialize(config)?;
    Ok(adapter)
}
