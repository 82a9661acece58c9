//! Gateway 应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::providers::Provider;

/// Gateway 应用状态
///
/// 请求之间不共享可变状态，只持有只读的 Provider 与超时配置
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn Provider>,
    model_timeout: Duration,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>, model_timeout: Duration) -> Self {
        Self {
            provider,
            model_timeout,
        }
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn model_timeout(&self) -> Duration {
        self.model_timeout
    }
}
