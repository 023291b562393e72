use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{HttpTransport, ProfileCache};

use super::{Orchestrator, ResultCache};

/// Construct the process-wide services once and wire them into an orchestrator.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator<HttpTransport>> {
    let transport = Arc::new(HttpTransport::new(&config.http)?);
    let profiles = Arc::new(ProfileCache::lru(config.cache.profile_capacity));
    let results = Arc::new(ResultCache::ttl(config.cache.result_ttl));

    info!(
        "Using {} with {} concurrent month fetches",
        config.http.api_base_url, config.concurrency_limit
    );

    Ok(Orchestrator::new(config, transport, profiles, results))
}
