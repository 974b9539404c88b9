use pyo3::{Py, PyAny, PyRef, PyResult, pyclass, pymethods};

use crate::{
    Detection, FrameGeometry, SortTracker, TrackerConfig,
    python_api::{PyDetection, PyPredictor, PyTrack},
};

#[pyclass(name = "Tracker")]
pub struct PyTracker {
    inner: SortTracker<PyPredictor>,
}

#[pymethods]
impl PyTracker {
    #[new]
    #[pyo3(signature = (
        predictor,
        width,
        height,
        fps,
        max_width,
        max_height,
        max_fps,
        max_age=1,
        min_hits=3,
        iou_threshold=0.3
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        predictor: Py<PyAny>,
        width: f64,
        height: f64,
        fps: f64,
        max_width: f64,
        max_height: f64,
        max_fps: f64,
        max_age: u32,
        min_hits: u32,
        iou_threshold: f64,
    ) -> PyResult<PyTracker> {
        let geometry = FrameGeometry::new(width, height, fps, max_width, max_height, max_fps)?;
        let config = TrackerConfig {
            max_age,
            min_hits,
            iou_threshold,
        };
        Ok(Self {
            inner: SortTracker::new(config, geometry, PyPredictor::new(predictor))?,
        })
    }

    #[getter]
    fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    #[getter]
    fn num_tracks(&self) -> usize {
        self.inner.tracks().len()
    }

    pub fn update(&mut self, detections: Vec<PyRef<PyDetection>>) -> Vec<PyTrack> {
        let inner_detections = detections
            .iter()
            .map(|detection| detection.inner)
            .collect::<Vec<Detection>>();

        self.inner
            .update(&inner_detections)
            .into_iter()
            .map(PyTrack::from)
            .collect()
    }

    /// Takes `[x_1, y_1, x_2, y_2, score]` rows and returns
    /// `[x_1, y_1, x_2, y_2, id]` rows.
    pub fn update_rows(&mut self, rows: Vec<[f64; 5]>) -> Vec<[f64; 5]> {
        let inner_detections = rows
            .into_iter()
            .map(Detection::from_array)
            .collect::<Vec<Detection>>();

        self.inner
            .update(&inner_detections)
            .iter()
            .map(|output| output.to_array())
            .collect()
    }
}
