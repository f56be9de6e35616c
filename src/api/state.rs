use std::sync::Arc;

use crate::service::AirportLocator;

/// Shared state handed to every handler
///
/// The locator is constructed once in `main` and cloned cheaply per
/// request via the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<AirportLocator>,
}
