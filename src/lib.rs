//! SORT-style multi-object tracking with a pluggable motion model.
//!
//! Each frame the [`SortTracker`] asks its [`Predictor`] where every track
//! will be, matches the predictions against the new detections by iou with
//! an optimal assignment, corrects matched tracks with their detection,
//! starts tracks for unmatched detections and drops tracks that went
//! unmatched for too long.
mod associate;
mod bbox;
mod error;
mod kalman_predictor;
mod pipeline;
mod predictor;
mod sort_tracker;
mod state;
mod track;
#[cfg(feature = "python")]
mod python_api;

pub use associate::{Association, associate_detections_to_tracks, calc_iou_matrix, solve_assignment};
pub use bbox::BBox;
pub use error::{Error, Result};
pub use kalman_predictor::KalmanPredictor;
pub use pipeline::{FrameResult, TrackingPipeline};
pub use predictor::{ConstantVelocityPredictor, LastStatePredictor, Predictor};
pub use sort_tracker::{Detection, IdGenerator, SortTracker, TrackOutput, TrackerConfig};
pub use state::{FrameGeometry, State, box_features, with_context};
pub use track::Track;

#[cfg(feature = "python")]
use pyo3::{
    Bound, PyResult, pymodule,
    types::{PyModule, PyModuleMethods},
};

#[cfg(feature = "python")]
use crate::python_api::{PyBBox, PyDetection, PyTrack, PyTracker};

#[cfg(feature = "python")]
#[pymodule]
fn seq_sort(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBBox>()?;
    m.add_class::<PyDetection>()?;
    m.add_class::<PyTrack>()?;
    m.add_class::<PyTracker>()?;

    Ok(())
}
