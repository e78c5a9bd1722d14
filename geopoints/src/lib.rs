//! # geopoints - PostGIS feature collections
//!
//! Loads the contents of a PostGIS table as a single GeoJSON
//! `FeatureCollection`. PostGIS does the geometry serialization
//! (`ST_AsGeoJSON`); this crate runs the query, reads the aggregated row and
//! decodes it into typed values that serialize back to the same document.
//!
//! ## Quick Start
//!
//! ```ignore
//! use geopoints::{DatabaseConfig, PgFeatureStore, PointsService};
//!
//! let config = DatabaseConfig::from_env()?;
//! let service = PointsService::new(PgFeatureStore::connect(&config).await?);
//!
//! let collection = service.feature_collection().await?;
//! println!("{}", serde_json::to_string(&collection)?);
//! ```
//!
//! ## Query
//!
//! The whole table is aggregated in one statement:
//!
//! ```sql
//! SELECT json_build_object(
//!     'type', 'FeatureCollection',
//!     'features', json_agg(ST_AsGeoJSON(tbl.*)::json))::text
//! FROM geo_accidents AS tbl
//! ```

pub mod config;
pub mod error;
pub mod geojson;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod service;
pub mod store;

// Re-export main types at crate root for convenience
pub use config::DatabaseConfig;
pub use error::{ConfigError, PointsError, Result};
pub use geojson::{Feature, FeatureCollection, Geometry, Properties};
pub use service::PointsService;
pub use store::{FeatureStore, PgFeatureStore, RowPayload};
