use crate::geo::GeoResolver;
use crate::storage::VisitorStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VisitorStore>,
    pub geo: Arc<GeoResolver>,
}

impl AppState {
    pub fn new(store: Arc<dyn VisitorStore>, geo: GeoResolver) -> Self {
        Self {
            store,
            geo: Arc::new(geo),
        }
    }
}
