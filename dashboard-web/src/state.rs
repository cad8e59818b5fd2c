// dashboard-web/src/state.rs
use actix::Addr;
use common::guard::GuardPolicy;
use common::Config;
use std::sync::Arc;

use crate::api::Backend;
use crate::cache::QueryCacheActor;

/// Shared by every worker through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub cache: Addr<QueryCacheActor>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, cache: Addr<QueryCacheActor>, config: Config) -> Self {
        Self {
            backend,
            cache,
            config: Arc::new(config),
        }
    }

    pub fn guard_policy(&self) -> GuardPolicy {
        GuardPolicy::from(&self.config.auth)
    }
}
