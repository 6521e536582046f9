use std::future::Future;

use be_remote_db::{DatabaseManager, DbResult, NewTrip, Trip};

/// Persistence used by the trip routes.
pub trait TripStore: Send + Sync + 'static {
    /// Trips owned by `user_id`, newest first.
    fn list_trips(&self, user_id: &str) -> impl Future<Output = DbResult<Vec<Trip>>> + Send;

    fn create_trip(&self, trip: NewTrip) -> impl Future<Output = DbResult<Trip>> + Send;
}

impl TripStore for DatabaseManager {
    async fn list_trips(&self, user_id: &str) -> DbResult<Vec<Trip>> {
        DatabaseManager::list_trips(self, user_id).await
    }

    async fn create_trip(&self, trip: NewTrip) -> DbResult<Trip> {
        self.insert_trip(trip).await
    }
}
