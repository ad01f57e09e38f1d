use std::sync::Arc;

use promotrack_core::service::PromotionService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Promotion flows over the configured store.
    pub promotions: Arc<PromotionService>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
