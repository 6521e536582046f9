use bon::bon;
use chrono::{NaiveDate, Utc};
use sqlx::{
    migrate::MigrateDatabase,
    postgres::{PgPool, PgPoolOptions},
};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::DbResult,
    types::{NewTrip, Trip, TripStatus},
};

const TRIP_COLUMNS: &str = "id, user_id, title, destination, start_date, end_date, budget, status, description, created_at, updated_at";

/// Owns the Postgres pool. Built once at startup and shared through `Arc`;
/// call [`DatabaseManager::close`] after the HTTP server has drained.
#[derive(Debug)]
pub struct DatabaseManager {
    pub pool: PgPool,
}

#[bon]
impl DatabaseManager {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        if !sqlx::Postgres::database_exists(database_url).await? {
            info!("Database does not exist, creating it");
            sqlx::Postgres::create_database(database_url).await?;
        }

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        let db_manager = DatabaseManager { pool };

        Self::run_migrations(&db_manager.pool).await?;

        Ok(db_manager)
    }

    async fn run_migrations(pool: &PgPool) -> DbResult<()> {
        let migrator = sqlx::migrate!("./src/migrations");
        migrator.run(pool).await?;
        Ok(())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    #[builder]
    pub async fn create_trip(
        &self,
        id: Option<Uuid>,
        user_id: String,
        title: String,
        destination: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: Option<f64>,
        description: Option<String>,
        status: Option<TripStatus>,
    ) -> DbResult<Trip> {
        let id = id.unwrap_or_else(Uuid::now_v7);
        let now = Utc::now();
        let status = status.unwrap_or_default();

        let query = format!(
            r#"
            INSERT INTO trips (id, user_id, title, destination, start_date, end_date, budget, status, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TRIP_COLUMNS}
            "#
        );

        let trip = sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .bind(&user_id)
            .bind(&title)
            .bind(&destination)
            .bind(start_date)
            .bind(end_date)
            .bind(budget)
            .bind(status)
            .bind(&description)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(trip)
    }

    /// Inserts a trip from already-normalized request data.
    pub async fn insert_trip(&self, new_trip: NewTrip) -> DbResult<Trip> {
        self.create_trip()
            .user_id(new_trip.user_id)
            .title(new_trip.title)
            .destination(new_trip.destination)
            .start_date(new_trip.start_date)
            .end_date(new_trip.end_date)
            .maybe_budget(new_trip.budget)
            .maybe_description(new_trip.description)
            .call()
            .await
    }

    /// All trips owned by `user_id`, newest first.
    pub async fn list_trips(&self, user_id: &str) -> DbResult<Vec<Trip>> {
        let query = format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM trips
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        );

        let trips = sqlx::query_as::<_, Trip>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }
}
