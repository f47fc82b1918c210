use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{grid::ValueMatrix, Matrix};

/// Supplies per-cell values for a grid. Never fails: a source that cannot
/// produce values answers with an all-zero matrix of the requested shape.
#[async_trait]
pub trait ValueSource: Send + Sync {
    async fn fetch(&self, rows: usize, cols: usize) -> ValueMatrix;
}

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("valuation service answered {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed values: {0}")]
    Malformed(&'static str),
    #[error("expected {rows}x{cols} values, got {got_rows}x{got_cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
}

#[derive(Debug, Serialize)]
struct ValuesRequest {
    rows: usize,
    cols: usize,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    values: Matrix<f64>,
}

/// HTTP client for the valuation service. One attempt per call, bounded by
/// the client timeout.
#[derive(Debug, Clone)]
pub struct ValuesClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ValuesClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub async fn try_fetch(&self, rows: usize, cols: usize) -> Result<ValueMatrix, ValuationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ValuesRequest { rows, cols })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ValuationError::Status(response.status()));
        }
        let response: ValuesResponse = response.json().await?;

        let matrix =
            ValueMatrix::from_rows(response.values).ok_or(ValuationError::Malformed("ragged rows"))?;
        if (matrix.rows, matrix.cols) != (rows, cols) {
            return Err(ValuationError::DimensionMismatch {
                rows,
                cols,
                got_rows: matrix.rows,
                got_cols: matrix.cols,
            });
        }
        if matrix.values.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ValuationError::Malformed("negative or non-finite value"));
        }
        Ok(matrix)
    }
}

#[async_trait]
impl ValueSource for ValuesClient {
    async fn fetch(&self, rows: usize, cols: usize) -> ValueMatrix {
        match self.try_fetch(rows, cols).await {
            Ok(matrix) => {
                debug!("received {rows}x{cols} cell values from {}", self.endpoint);
                matrix
            }
            Err(e) => {
                warn!(
                    "cell values unavailable from {} ({e}), planning with zero values",
                    self.endpoint
                );
                ValueMatrix::zeros(rows, cols)
            }
        }
    }
}
