use nalgebra::Vector4;
use pyo3::{Py, PyAny, Python};

use crate::{Error, Predictor, Result, State};

/// Runs a Python object's `predict(history)` as the motion model.
///
/// `history` is passed as a batch holding one sequence, a
/// `1 x len x 7` nested list, which is the input rank sequence models expect.
/// The method may return the four box entries either flat or wrapped in a
/// batch of one.
pub struct PyPredictor {
    model: Py<PyAny>,
}

impl PyPredictor {
    pub fn new(model: Py<PyAny>) -> Self {
        Self { model }
    }
}

impl Predictor for PyPredictor {
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>> {
        let rows: Vec<Vec<f64>> = history
            .iter()
            .map(|state| state.iter().copied().collect())
            .collect();

        let values = Python::with_gil(|py| -> pyo3::PyResult<Vec<f64>> {
            let output = self.model.call_method1(py, "predict", (vec![rows],))?;
            match output.extract::<Vec<f64>>(py) {
                Ok(values) => Ok(values),
                Err(_) => Ok(output
                    .extract::<Vec<Vec<f64>>>(py)?
                    .into_iter()
                    .next()
                    .unwrap_or_default()),
            }
        })
        .map_err(|e| Error::predictor(e.to_string()))?;

        if values.len() != 4 {
            return Err(Error::predictor(format!(
                "expected 4 box values from predict, got {}",
                values.len()
            )));
        }
        Ok(Vector4::from_column_slice(&values))
    }
}
