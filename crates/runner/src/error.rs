use depthwatch_detector::DetectorError;
use depthwatch_ports::FetchError;
use thiserror::Error;

/// Why a single polling cycle produced no snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Detection failed: {0}")]
    Detector(#[from] DetectorError),
}
