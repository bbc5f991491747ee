use std::sync::Arc;
use std::time::Duration;

use crate::assets::{AssetResolver, DirAssetResolver};
use crate::config::Config;
use crate::errors::ServerError;
use crate::filter::SpatialFilter;
use crate::service::QueryService;
use crate::store::ShiftStore;

/// Everything a request handler needs, shared by all worker threads.
pub struct AppState {
    pub service: QueryService,
    pub assets: DirAssetResolver,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
}

impl AppState {
    pub fn build(config: &Config, store: Arc<ShiftStore>) -> Result<Self, ServerError> {
        let filter = SpatialFilter::new(config.catchment_radius_m, config.candidate_cap)?;
        let assets = DirAssetResolver::new(&config.images_dir);
        let resolver: Arc<dyn AssetResolver> = Arc::new(assets.clone());

        Ok(Self {
            service: QueryService::new(store, filter, resolver),
            assets,
            request_timeout: config.request_timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }
}
