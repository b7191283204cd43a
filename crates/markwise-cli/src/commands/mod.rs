pub mod batch;
pub mod evaluate;
pub mod init;
pub mod validate;
pub mod weights;

use std::sync::Arc;

use anyhow::Result;

use markwise_core::traits::Assessor;
use markwise_providers::{assessor_from_config, MarkwiseConfig};

/// Check a requested temperature before any provider is built.
pub fn check_temperature(temperature: Option<f64>) -> Result<()> {
    if let Some(t) = temperature {
        anyhow::ensure!(
            (0.0..=2.0).contains(&t),
            "temperature must be between 0.0 and 2.0"
        );
    }
    Ok(())
}

/// Build the assessor selected by the command-line flags.
pub fn build_assessor(
    config: &MarkwiseConfig,
    provider: Option<&str>,
    model: Option<&str>,
    temperature: Option<f64>,
) -> Result<Arc<dyn Assessor>> {
    let settings = config.assessor_settings(model, temperature);
    tracing::debug!(model = %settings.model, temperature = settings.temperature, "building assessor");
    assessor_from_config(config, provider, settings)
}
