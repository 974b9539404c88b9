use nalgebra::Vector4;

use crate::{
    error::{Error, Result},
    state::{State, box_features},
};

/// Motion model plugged into every track.
///
/// Given a track's full history of normalized states (oldest first, never
/// empty) it returns the four box entries of the next state. The tracker
/// appends the sequence context itself.
///
/// Any `FnMut(&[State]) -> Result<Vector4<f64>>` closure is a predictor.
pub trait Predictor {
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>>;
}

impl<F> Predictor for F
where
    F: FnMut(&[State]) -> Result<Vector4<f64>>,
{
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>> {
        self(history)
    }
}

fn last_state(history: &[State]) -> Result<&State> {
    history
        .last()
        .ok_or_else(|| Error::predictor("cannot predict from an empty history"))
}

/// Assumes objects stand still.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastStatePredictor;

impl Predictor for LastStatePredictor {
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>> {
        last_state(history).map(box_features)
    }
}

/// Extrapolates the last step of the history one frame forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantVelocityPredictor;

impl Predictor for ConstantVelocityPredictor {
    fn predict(&mut self, history: &[State]) -> Result<Vector4<f64>> {
        let last = box_features(last_state(history)?);
        match history.len().checked_sub(2).map(|i| &history[i]) {
            Some(previous) => Ok(last + (last - box_features(previous))),
            None => Ok(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: f64, y: f64) -> State {
        State::from([x, y, 0.1, 0.2, 1.0, 1.0, 1.0])
    }

    #[test]
    fn test_empty_history_is_an_error() {
        assert!(LastStatePredictor.predict(&[]).is_err());
        assert!(ConstantVelocityPredictor.predict(&[]).is_err());
    }

    #[test]
    fn test_last_state_predictor_repeats_last_box() {
        let history = [state(0.1, 0.1), state(0.2, 0.3)];

        let prediction = LastStatePredictor.predict(&history).unwrap();

        assert_eq!(prediction, Vector4::new(0.2, 0.3, 0.1, 0.2));
    }

    #[test]
    fn test_constant_velocity_predictor_extrapolates() {
        let history = [state(0.0, 0.5), state(0.25, 0.5), state(0.5, 0.25)];

        let prediction = ConstantVelocityPredictor.predict(&history).unwrap();

        assert_eq!(prediction, Vector4::new(0.75, 0.0, 0.1, 0.2));
    }

    #[test]
    fn test_constant_velocity_predictor_holds_single_state() {
        let prediction = ConstantVelocityPredictor
            .predict(&[state(0.5, 0.5)])
            .unwrap();

        assert_eq!(prediction, Vector4::new(0.5, 0.5, 0.1, 0.2));
    }

    #[test]
    fn test_closures_are_predictors() {
        let mut calls = 0;
        let mut predictor = |history: &[State]| {
            calls += 1;
            Ok::<_, Error>(box_features(&history[0]))
        };

        let prediction = predictor.predict(&[state(0.3, 0.4)]).unwrap();

        assert_eq!(prediction, Vector4::new(0.3, 0.4, 0.1, 0.2));
        assert_eq!(calls, 1);
    }
}
