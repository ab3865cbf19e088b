use crate::domain::errors::{ModelStoreError, PredictError};
use crate::domain::features::FeatureRow;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

pub(crate) type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// The fitted ensemble regressor mapping a [`FeatureRow`] to a price.
///
/// Owned by whoever trained or loaded it; there is no shared instance.
#[derive(Debug)]
pub struct TrainedModel {
    forest: Forest,
}

impl TrainedModel {
    pub(crate) fn new(forest: Forest) -> Self {
        Self { forest }
    }

    /// Model output for one feature row. Defined for any numeric input;
    /// real-world meaning outside valid calendar ranges is undefined.
    pub fn predict_row(&self, row: FeatureRow) -> Result<f64, PredictError> {
        let input = DenseMatrix::from_2d_vec(&vec![row.to_input().to_vec()])
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let predictions = self
            .forest
            .predict(&input)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("no prediction returned".to_string()))
    }

    /// Persists the fitted forest as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ModelStoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &self.forest)?;
        info!("Saved model to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelStoreError> {
        let file = File::open(path)?;
        let forest = serde_json::from_reader(BufReader::new(file))?;
        info!("Loaded model from {:?}", path);
        Ok(Self { forest })
    }
}
