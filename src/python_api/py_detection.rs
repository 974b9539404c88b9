use pyo3::{pyclass, pymethods};

use crate::{Detection, python_api::PyBBox};

#[pyclass(name = "Detection")]
pub struct PyDetection {
    pub inner: Detection,
}

#[pymethods]
impl PyDetection {
    #[new]
    #[pyo3(signature = (bbox, score=1.0))]
    pub fn new(bbox: &PyBBox, score: f64) -> Self {
        Self {
            inner: Detection::new(bbox.inner, score),
        }
    }

    #[getter]
    fn bbox(&self) -> PyBBox {
        PyBBox {
            inner: self.inner.bbox,
        }
    }

    #[getter]
    fn score(&self) -> f64 {
        self.inner.score
    }

    fn __repr__(&self) -> String {
        format!(
            "Detection(bbox={}, score={})",
            self.bbox().__repr__(),
            self.inner.score
        )
    }
}
