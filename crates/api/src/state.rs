use std::sync::Arc;

use sqlx::PgPool;
use treehouse_core::events::EventBus;
use treehouse_core::Gateway;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. Wrapped in `Arc` so cloning is cheap. The gateway is held
/// behind the trait so a different backend can be injected wholesale.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    gateway: Arc<dyn Gateway>,
    pool: PgPool,
    config: AppConfig,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        pool: PgPool,
        config: AppConfig,
        event_bus: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                gateway,
                pool,
                config,
                event_bus,
            }),
        }
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
