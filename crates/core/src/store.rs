//! Single-slot in-memory covariance store.
//!
//! Holds the most recently uploaded covariance matrix. Uploads replace the
//! whole slot in one swap; readers get clones, never references into the
//! slot, so a read concurrent with an upload observes either the old or the
//! new matrix but never a torn one. Last write wins; there is no history
//! and no deletion.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EngineError;
use crate::types::CovarianceMatrix;
use crate::validate;

#[derive(Default)]
pub struct CovarianceStore {
    slot: RwLock<Option<CovarianceMatrix>>,
}

impl CovarianceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, uppercases, stamps and stores a covariance matrix,
    /// replacing whatever was stored before.
    ///
    /// # Errors
    /// Returns `EngineError::Validation` if symbols or matrix violate the
    /// shape/finiteness invariants. The slot is untouched on failure.
    pub async fn upload(
        &self,
        symbols: Vec<String>,
        matrix: Vec<Vec<f64>>,
    ) -> Result<CovarianceMatrix, EngineError> {
        let symbols = validate::validate_symbols(&symbols)?;
        validate::validate_matrix(symbols.len(), &matrix)?;

        let record = CovarianceMatrix {
            id: Uuid::new_v4().to_string(),
            symbols,
            matrix,
            uploaded_at: Utc::now(),
        };
        tracing::info!(
            id = %record.id,
            assets = record.size(),
            "Stored covariance matrix"
        );

        *self.slot.write().await = Some(record.clone());
        Ok(record)
    }

    /// Returns a clone of the stored matrix if its id matches exactly.
    pub async fn get(&self, id: &str) -> Option<CovarianceMatrix> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|stored| stored.id == id)
            .cloned()
    }

    /// Returns a clone of the stored matrix regardless of id.
    pub async fn latest(&self) -> Option<CovarianceMatrix> {
        self.slot.read().await.clone()
    }
}
