//! In-memory [`FeatureStore`] for tests.
//!
//! Enabled with the `test-utils` feature so other crates can use it:
//!
//! ```toml
//! [dev-dependencies]
//! geopoints = { path = "../geopoints", features = ["test-utils"] }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::store::{FeatureStore, RowPayload};

#[derive(Debug)]
enum Canned {
    Rows(Vec<CannedRow>),
    QueryError,
}

#[derive(Debug, Clone)]
enum CannedRow {
    Payload(Vec<u8>),
    Unreadable,
}

/// Store that answers every query with the same canned result.
///
/// Clones share the call counter and closed flag.
#[derive(Debug, Clone)]
pub struct StaticFeatureStore {
    canned: Arc<Canned>,
    calls: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
}

impl StaticFeatureStore {
    fn from_canned(canned: Canned) -> Self {
        Self {
            canned: Arc::new(canned),
            calls: Arc::new(AtomicU64::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Return the given rows. `Err` rows fail to scan.
    pub fn with_payloads(rows: Vec<RowPayload>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Ok(bytes) => CannedRow::Payload(bytes),
                Err(_) => CannedRow::Unreadable,
            })
            .collect();
        Self::from_canned(Canned::Rows(rows))
    }

    /// Return a single row holding `json`.
    pub fn with_collection_json(json: &str) -> Self {
        Self::from_canned(Canned::Rows(vec![CannedRow::Payload(
            json.as_bytes().to_vec(),
        )]))
    }

    /// Return no rows.
    pub fn empty() -> Self {
        Self::from_canned(Canned::Rows(Vec::new()))
    }

    /// Fail the query as if the connection were gone.
    pub fn failing_query() -> Self {
        Self::from_canned(Canned::QueryError)
    }

    /// Return a single row whose column cannot be read.
    pub fn unreadable_row() -> Self {
        Self::from_canned(Canned::Rows(vec![CannedRow::Unreadable]))
    }

    /// Number of queries run so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether [`FeatureStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureStore for StaticFeatureStore {
    async fn fetch_payloads(&self) -> Result<Vec<RowPayload>, sqlx::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // sqlx::Error is not Clone, so errors are rebuilt per call.
        match &*self.canned {
            Canned::QueryError => Err(sqlx::Error::PoolClosed),
            Canned::Rows(rows) => Ok(rows
                .iter()
                .map(|row| match row {
                    CannedRow::Payload(bytes) => Ok(bytes.clone()),
                    CannedRow::Unreadable => Err(sqlx::Error::ColumnDecode {
                        index: "0".to_string(),
                        source: "mismatched types; column is not text".into(),
                    }),
                })
                .collect()),
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
