use pyo3::{pyclass, pymethods};

use crate::BBox;

/// Pixel box exposed to Python. Corners are read-only; build a new box to
/// move one.
#[pyclass(name = "BBox", eq)]
#[derive(Clone, PartialEq)]
pub struct PyBBox {
    pub inner: BBox,
}

#[pymethods]
impl PyBBox {
    #[new]
    pub fn new(x_1: f64, y_1: f64, x_2: f64, y_2: f64) -> Self {
        Self {
            inner: BBox::new(x_1, y_1, x_2, y_2),
        }
    }

    #[staticmethod]
    fn from_list(coords: [f64; 4]) -> Self {
        Self {
            inner: BBox::from_array(coords),
        }
    }

    #[getter]
    fn corners(&self) -> (f64, f64, f64, f64) {
        let BBox { x_1, y_1, x_2, y_2 } = self.inner;
        (x_1, y_1, x_2, y_2)
    }

    #[getter]
    fn width(&self) -> f64 {
        self.inner.width()
    }

    #[getter]
    fn height(&self) -> f64 {
        self.inner.height()
    }

    fn area(&self) -> f64 {
        self.inner.area()
    }

    fn iou(&self, other: &PyBBox) -> f64 {
        self.inner.iou(&other.inner)
    }

    fn to_list(&self) -> [f64; 4] {
        self.inner.to_array()
    }

    pub fn __repr__(&self) -> String {
        let [x_1, y_1, x_2, y_2] = self.inner.to_array();
        format!("BBox({x_1}, {y_1}, {x_2}, {y_2})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_compare_by_corners() {
        let bbox = PyBBox::new(1.0, 2.0, 3.0, 5.0);

        assert!(bbox == PyBBox::from_list([1.0, 2.0, 3.0, 5.0]));
        assert!(bbox != PyBBox::new(1.0, 2.0, 3.0, 6.0));
        assert_eq!(bbox.corners(), (1.0, 2.0, 3.0, 5.0));
        assert_eq!(bbox.__repr__(), "BBox(1, 2, 3, 5)");
    }
}
