use std::sync::Arc;

use log::debug;
use reqwest::StatusCode;

use crate::cache::Cache;
use crate::error::AppError;

use super::{decode::PlayerProfile, Endpoints, FetchResult, Transport};

/// Successful profile lookups keyed by lowercase username.
pub type ProfileCache = Cache<String, Arc<PlayerProfile>>;

/// Confirms a player exists upstream before any archive work starts.
pub struct ProfileLookup<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
    cache: &'a ProfileCache,
}

impl<'a, T: Transport> ProfileLookup<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a Endpoints, cache: &'a ProfileCache) -> Self {
        Self {
            transport,
            endpoints,
            cache,
        }
    }

    pub async fn lookup(&self, username: &str) -> FetchResult<Arc<PlayerProfile>> {
        let key = username.to_lowercase();
        if let Some(profile) = self.cache.get(&key) {
            debug!("Profile cache hit for {username}");
            return Ok(profile);
        }

        let response = self.transport.get(&self.endpoints.profile(username)).await?;
        match response.status {
            status if status.is_success() => {
                let profile = Arc::new(response.json::<PlayerProfile>()?);
                self.cache.set(key, Arc::clone(&profile));
                Ok(profile)
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound),
            status => Err(AppError::upstream_status(status)),
        }
    }
}
