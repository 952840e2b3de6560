use std::sync::Arc;

use lifecycle::LifecycleEngine;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub engine: LifecycleEngine,
    pub config: Arc<AppConfig>,
}
