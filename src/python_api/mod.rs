mod py_bbox;
mod py_detection;
mod py_predictor;
mod py_track;
mod py_tracker;

use pyo3::{PyErr, exceptions::PyValueError};

pub use py_bbox::PyBBox;
pub use py_detection::PyDetection;
pub use py_predictor::PyPredictor;
pub use py_track::PyTrack;
pub use py_tracker::PyTracker;

impl From<crate::Error> for PyErr {
    fn from(err: crate::Error) -> Self {
        PyValueError::new_err(err.to_string())
    }
}
