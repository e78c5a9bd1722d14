//! Feature collection service.
//!
//! [`PointsService`] wraps a [`FeatureStore`] and turns its raw row payloads
//! into a [`FeatureCollection`].
//!
//! ```ignore
//! use geopoints::{DatabaseConfig, PgFeatureStore, PointsService};
//!
//! let store = PgFeatureStore::connect(&DatabaseConfig::from_env()?).await?;
//! let service = PointsService::new(store);
//!
//! let collection = service.feature_collection().await?;
//! println!("{} features", collection.features().len());
//! ```

use std::sync::Arc;

use crate::error::{PointsError, Result};
use crate::geojson::{decode_feature_collection, FeatureCollection};
use crate::store::FeatureStore;

/// Loads feature collections from a shared store.
///
/// Cloning is cheap and every clone uses the same store.
#[derive(Clone)]
pub struct PointsService {
    store: Arc<dyn FeatureStore>,
}

impl PointsService {
    /// Create a service over `store`.
    pub fn new(store: impl FeatureStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Run the collection query and decode the result.
    ///
    /// Rows are scanned and decoded in order. Each decoded row replaces the
    /// previous one, so with several rows only the last is returned. The
    /// query is expected to aggregate into a single row. Zero rows yield
    /// [`FeatureCollection::default`].
    ///
    /// # Errors
    ///
    /// Stops at the first failure:
    /// - [`PointsError::Query`] if the query could not be executed
    /// - [`PointsError::Scan`] if a row's column could not be read
    /// - [`PointsError::Unmarshal`] if a payload is not a feature collection
    pub async fn feature_collection(&self) -> Result<FeatureCollection> {
        let rows = self
            .store
            .fetch_payloads()
            .await
            .map_err(PointsError::Query)?;

        if rows.len() > 1 {
            tracing::warn!(
                rows = rows.len(),
                "Collection query returned more than one row, keeping the last"
            );
        }

        let mut collection = FeatureCollection::default();
        for row in rows {
            let payload = row.map_err(PointsError::Scan)?;
            collection = decode_feature_collection(&payload)?;
        }

        Ok(collection)
    }

    /// Release the underlying store.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

impl std::fmt::Debug for PointsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointsService").finish_non_exhaustive()
    }
}
