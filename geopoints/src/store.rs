//! Backing stores for feature collection payloads.
//!
//! A store runs the collection query and hands back one payload per result
//! row. Decoding happens in [`PointsService`](crate::PointsService), so stores
//! only deal with the database.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::config::DatabaseConfig;

/// Aggregates the whole `geo_accidents` table into a single GeoJSON
/// `FeatureCollection` document. Cast to text so the payload arrives as
/// plain JSON bytes.
pub const FEATURE_COLLECTION_QUERY: &str = "SELECT json_build_object(\
    'type', 'FeatureCollection', \
    'features', json_agg(ST_AsGeoJSON(tbl.*)::json))::text \
    FROM geo_accidents AS tbl";

/// Outcome of reading the JSON column of one result row.
pub type RowPayload = Result<Vec<u8>, sqlx::Error>;

/// A source of feature collection payloads.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Run the collection query.
    ///
    /// The outer error means the query itself failed. Each element of the
    /// returned vector is one row, in result order, either its payload bytes
    /// or the error raised while reading it. Cursors and connections are
    /// released before this returns.
    async fn fetch_payloads(&self) -> Result<Vec<RowPayload>, sqlx::Error>;

    /// Release any resources held by the store.
    async fn close(&self) {}
}

/// [`FeatureStore`] backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgFeatureStore {
    pool: PgPool,
}

impl PgFeatureStore {
    /// Connect to the database described by `config`.
    ///
    /// Connects eagerly, so an unreachable database is reported here rather
    /// than on the first request.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(config.connect_options())
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FeatureStore for PgFeatureStore {
    async fn fetch_payloads(&self) -> Result<Vec<RowPayload>, sqlx::Error> {
        let rows = sqlx::query(FEATURE_COLLECTION_QUERY)
            .fetch_all(&self.pool)
            .await?;

        // NULL scans as an empty payload and fails later at decode.
        Ok(rows
            .iter()
            .map(|row| {
                row.try_get::<Option<String>, _>(0)
                    .map(|json| json.map(String::into_bytes).unwrap_or_default())
            })
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_aggregates_into_one_collection() {
        assert!(FEATURE_COLLECTION_QUERY.starts_with("SELECT json_build_object("));
        assert!(FEATURE_COLLECTION_QUERY.contains("'type', 'FeatureCollection'"));
        assert!(FEATURE_COLLECTION_QUERY.contains("json_agg(ST_AsGeoJSON(tbl.*)::json)"));
        assert!(FEATURE_COLLECTION_QUERY.ends_with("FROM geo_accidents AS tbl"));
        assert!(!FEATURE_COLLECTION_QUERY.contains('$'));
    }

    #[tokio::test]
    async fn test_lazy_pool_reports_query_error() {
        let options = DatabaseConfig::default()
            .host("127.0.0.1")
            .port(1)
            .connect_options();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy_with(options);
        let store = PgFeatureStore::from_pool(pool);

        assert!(store.fetch_payloads().await.is_err());
        store.close().await;
        assert!(store.pool().is_closed());
    }
}
