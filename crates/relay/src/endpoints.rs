//! Delivery identity management: one live webhook per target channel.

use std::collections::BTreeMap;

use {
    mimic_store::MapStore,
    tracing::{debug, info},
};

use crate::{
    error::{Error, Result},
    platform::{ChannelId, ChatGateway, DeliveryEndpoint},
};

/// Lazily provisions and repairs per-target delivery endpoints.
///
/// Locators live in a persisted cache keyed by target channel. A cached
/// locator is re-validated against the platform before reuse; an entry the
/// platform reports gone is discarded and replaced, and the cache is
/// persisted immediately after every creation.
pub struct EndpointManager<'a> {
    gateway: &'a dyn ChatGateway,
    store: &'a MapStore,
    endpoint_name: &'a str,
    cache: BTreeMap<String, String>,
}

impl<'a> EndpointManager<'a> {
    /// Load the persisted locator cache.
    pub async fn load(
        gateway: &'a dyn ChatGateway,
        store: &'a MapStore,
        endpoint_name: &'a str,
    ) -> Result<Self> {
        let cache = store.load().await?;
        Ok(Self {
            gateway,
            store,
            endpoint_name,
            cache,
        })
    }

    /// Return the live endpoint for `target`, creating one if none is
    /// cached or the cached locator no longer resolves.
    ///
    /// A transport fault during validation propagates rather than minting a
    /// duplicate endpoint for a webhook that may still exist.
    pub async fn get_or_create(&mut self, target: ChannelId) -> Result<Box<dyn DeliveryEndpoint>> {
        let key = target.to_string();

        if let Some(locator) = self.cache.get(&key) {
            match self.gateway.resolve_endpoint(locator).await {
                Ok(Some(endpoint)) => {
                    debug!(target, "reusing cached webhook");
                    return Ok(endpoint);
                },
                Ok(None) => {
                    info!(target, "cached webhook no longer exists, replacing");
                    self.cache.remove(&key);
                },
                Err(e) => return Err(Error::endpoint(target, e)),
            }
        }

        let endpoint = self
            .gateway
            .create_endpoint(target, self.endpoint_name)
            .await
            .map_err(|e| Error::endpoint(target, e))?;

        self.cache.insert(key, endpoint.locator().to_string());
        self.store.save(&self.cache).await?;
        info!(target, "created webhook");
        Ok(endpoint)
    }
}
