use pyo3::{pyclass, pymethods};

use crate::{TrackOutput, python_api::PyBBox};

/// A box reported by the tracker for one frame.
#[pyclass(name = "Track")]
pub struct PyTrack {
    #[pyo3(get)]
    pub id: u64,
    pub bbox: PyBBox,
}

impl From<TrackOutput> for PyTrack {
    fn from(output: TrackOutput) -> Self {
        Self {
            id: output.id,
            bbox: PyBBox { inner: output.bbox },
        }
    }
}

#[pymethods]
impl PyTrack {
    #[getter]
    fn bbox(&self) -> PyBBox {
        self.bbox.clone()
    }

    /// `[x_1, y_1, x_2, y_2, id]`, the row layout of the MOT result files.
    fn to_list(&self) -> [f64; 5] {
        let bbox = self.bbox.inner;
        [bbox.x_1, bbox.y_1, bbox.x_2, bbox.y_2, self.id as f64]
    }

    fn __repr__(&self) -> String {
        format!("Track(id={}, bbox={})", self.id, self.bbox.__repr__())
    }
}
