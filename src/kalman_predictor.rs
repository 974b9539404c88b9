use kfilter::{
    Kalman1M, KalmanPredict, measurement::LinearMeasurement, system::LinearNoInputSystem,
};
use nalgebra::{SMatrix, SVector, Vector4};

use crate::{
    error::{Error, Result},
    predictor::Predictor,
    state::{State, box_features},
};

type BoxFilter =
    Kalman1M<f64, 8, 0, 4, LinearNoInputSystem<f64, 8>, LinearMeasurement<f64, 8, 4>>;

/// Constant-velocity Kalman filter over the four normalized box entries.
///
/// The filter state is `[x_1, y_1, w, h, vx_1, vy_1, vw, vh]`. Tracks keep no
/// filter of their own: every call rebuilds one from the first of the last
/// `window` history entries and feeds it the remaining ones, so the result
/// depends on the history alone.
#[derive(Debug, Clone, Copy)]
pub struct KalmanPredictor {
    window: usize,
}

impl Default for KalmanPredictor {
    fn default() -> Self {
        Self { window: 30 }
    }
}

impl KalmanPredictor {
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::config("kalman window must hold at least one state"));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    #[allow(non_snake_case)]
    fn new_filter(z: Vector4<f64>) -> BoxFilter {
        let mut F = SMatrix::<f64, 8, 8>::identity();
        for i in 0..4 {
            F[(i, i + 4)] = 1.0;
        }
        let Q_diag =
            SVector::<f64, 8>::from_vec(vec![1e-5, 1e-5, 1e-5, 1e-5, 1e-6, 1e-6, 1e-7, 1e-7]);
        let Q = SMatrix::<f64, 8, 8>::from_diagonal(&Q_diag);
        let mut x_initial = SVector::<f64, 8>::zeros();
        x_initial.fixed_rows_mut::<4>(0).copy_from(&z);
        let system = LinearNoInputSystem::new(F, Q, x_initial);

        let P_diag =
            SVector::<f64, 8>::from_vec(vec![1e-3, 1e-3, 1e-3, 1e-3, 1e-1, 1e-1, 1e-1, 1e-1]);
        let P = SMatrix::<f64, 8, 8>::from_diagonal(&P_diag);

        let H = SMatrix::<f64, 4, 8>::identity();
        let R_diag = SVector::<f64, 4>::new(1e-4, 1e-4, 1e-3, 1e-3);
        let R = SMatrix::from_diagonal(&R_diag);
        let measurement = LinearMeasurement::new(H, R, z);

        Kalman1M::new_custom(system, P, measurement)
    }
}

impl Predictor for KalmanPredictor {
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>> {
        let start = history.len().saturating_sub(self.window);
        let (first, rest) = history[start..]
            .split_first()
            .ok_or_else(|| Error::predictor("cannot predict from an empty history"))?;

        let mut kalman_filter = Self::new_filter(box_features(first));
        for state in rest {
            kalman_filter.predict();
            kalman_filter.update(box_features(state));
        }

        Ok(kalman_filter
            .predict()
            .fixed_rows::<4>(0)
            .clone_owned())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn state(x: f64) -> State {
        State::from([x, 0.2, 0.05, 0.1, 0.25, 1.0, 1.0])
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert!(KalmanPredictor::new(0).is_err());
        assert_eq!(KalmanPredictor::new(5).unwrap().window(), 5);
    }

    #[test]
    fn test_empty_history_is_an_error() {
        assert!(KalmanPredictor::default().predict(&[]).is_err());
    }

    #[test]
    fn test_static_box_stays_in_place() {
        let history = vec![state(0.4); 6];

        let prediction = KalmanPredictor::default().predict(&history).unwrap();

        assert_relative_eq!(prediction, box_features(&state(0.4)), epsilon = 1e-9);
    }

    #[test]
    fn test_moving_box_is_extrapolated_forward() {
        let history = (0..10).map(|i| state(0.1 + 0.01 * i as f64)).collect::<Vec<_>>();

        let prediction = KalmanPredictor::default().predict(&history).unwrap();

        assert!(prediction[0] > 0.19, "prediction {} did not move forward", prediction[0]);
        assert!(prediction[0] < 0.21);
        assert_relative_eq!(prediction[1], 0.2, epsilon = 1e-9);
    }
}
