use std::sync::Arc;

use be_remote_db::DatabaseManager;

use crate::store::TripStore;

pub struct AppState<S: TripStore = DatabaseManager> {
    pub store: Arc<S>,
}

impl<S: TripStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}
