use thiserror::Error;

/// Errors from fetching and cleaning the historical price series.
///
/// Callers can react differently to the three cases: the network is down,
/// the page layout changed, or the page was reachable but no usable rows
/// survived cleaning.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch price history: {0}")]
    Network(#[from] reqwest::Error),

    #[error("price table not found at index {index} (page has {found} tables)")]
    TableNotFound { index: usize, found: usize },

    #[error("no rows survived cleaning")]
    EmptyAfterCleaning,
}

/// Errors from fitting and scoring the regression model.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("cannot train on an empty price series")]
    EmptySeries,

    #[error("not enough data to split {rows} rows with test fraction {test_fraction}")]
    NotEnoughData { rows: usize, test_fraction: f64 },

    #[error("model fit failed: {0}")]
    Fit(String),
}

/// Errors from resolving a prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid prediction date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("model inference failed: {0}")]
    Inference(String),
}

/// Errors from persisting or reloading a trained model.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("model file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_formatting() {
        let err = LoadError::TableNotFound { index: 2, found: 1 };
        let msg = err.to_string();
        assert!(msg.contains("index 2"));
        assert!(msg.contains("1 tables"));
    }

    #[test]
    fn train_error_formatting() {
        let err = TrainError::NotEnoughData {
            rows: 3,
            test_fraction: 0.2,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("0.2"));
    }
}
