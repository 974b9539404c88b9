use crate::{
    error::Result,
    predictor::Predictor,
    state::{State, with_context},
};

/// A single tracked identity.
///
/// Tentative, confirmed and lost are not stored; they follow from the
/// counters and the tracker configuration.
#[derive(Debug, Clone)]
pub struct Track {
    id: u64,
    history: Vec<State>,
    age: u32,
    time_since_update: u32,
    hits: u32,
    hit_streak: u32,
}

impl Track {
    pub fn new(initial_state: State, id: u64) -> Self {
        Self {
            id,
            history: vec![initial_state],
            age: 0,
            time_since_update: 0,
            hits: 0,
            hit_streak: 0,
        }
    }

    /// Advances the track by one frame and appends the predicted state.
    ///
    /// The history grows by exactly one entry per call. When the predictor
    /// fails, the last state is repeated and the error returned.
    pub fn predict<P: Predictor + ?Sized>(&mut self, predictor: &mut P) -> Result<State> {
        self.age += 1;

        if self.time_since_update > 0 {
            self.hit_streak = 0;
        }

        self.time_since_update += 1;

        match predictor.predict(&self.history) {
            Ok(box_features) => {
                let state = with_context(&box_features, &self.history[0]);
                self.history.push(state);
                Ok(state)
            }
            Err(err) => {
                let last = *self.get_state();
                self.history.push(last);
                Err(err)
            }
        }
    }

    /// Replaces the state appended by the last [`Track::predict`] with the
    /// observed one.
    ///
    /// Must be called at most once per frame, after `predict`.
    pub fn update(&mut self, observed: State) {
        self.time_since_update = 0;
        self.hits += 1;
        self.hit_streak += 1;
        if let Some(last) = self.history.last_mut() {
            *last = observed;
        }
    }

    pub fn get_state(&self) -> &State {
        // history starts with the initial state and only grows
        &self.history[self.history.len() - 1]
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn time_since_update(&self) -> u32 {
        self.time_since_update
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn hit_streak(&self) -> u32 {
        self.hit_streak
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector4;

    use super::*;
    use crate::{
        error::Error,
        predictor::{ConstantVelocityPredictor, LastStatePredictor},
    };

    fn state(x: f64) -> State {
        State::from([x, 0.1, 0.1, 0.1, 0.5, 0.6, 0.7])
    }

    #[test]
    fn test_new_track_starts_with_zeroed_counters() {
        let track = Track::new(state(0.2), 7);

        assert_eq!(track.id(), 7);
        assert_eq!(track.history(), &[state(0.2)]);
        assert_eq!(track.age(), 0);
        assert_eq!(track.time_since_update(), 0);
        assert_eq!(track.hits(), 0);
        assert_eq!(track.hit_streak(), 0);
    }

    #[test]
    fn test_predict_appends_one_state_with_initial_context() {
        let mut track = Track::new(state(0.2), 0);
        let mut predictor = |_: &[State]| Ok::<_, Error>(Vector4::new(0.3, 0.4, 0.05, 0.06));

        let predicted = track.predict(&mut predictor).unwrap();

        assert_eq!(predicted, State::from([0.3, 0.4, 0.05, 0.06, 0.5, 0.6, 0.7]));
        assert_eq!(track.history().len(), 2);
        assert_eq!(track.get_state(), &predicted);
        assert_eq!(track.age(), 1);
        assert_eq!(track.time_since_update(), 1);
    }

    #[test]
    fn test_update_overwrites_prediction() {
        let mut track = Track::new(state(0.2), 0);
        track.predict(&mut ConstantVelocityPredictor).unwrap();

        track.update(state(0.25));

        assert_eq!(track.history(), &[state(0.2), state(0.25)]);
        assert_eq!(track.time_since_update(), 0);
        assert_eq!(track.hits(), 1);
        assert_eq!(track.hit_streak(), 1);
    }

    #[test]
    fn test_hit_streak_resets_after_a_miss() {
        let mut track = Track::new(state(0.2), 0);
        for _ in 0..3 {
            track.predict(&mut LastStatePredictor).unwrap();
            track.update(state(0.2));
        }
        assert_eq!(track.hit_streak(), 3);

        // missed frame: the streak survives until the next predict
        track.predict(&mut LastStatePredictor).unwrap();
        assert_eq!(track.hit_streak(), 3);
        assert_eq!(track.time_since_update(), 1);

        track.predict(&mut LastStatePredictor).unwrap();
        assert_eq!(track.hit_streak(), 0);
        assert_eq!(track.time_since_update(), 2);
        assert_eq!(track.hits(), 3);
        assert_eq!(track.age(), 5);
        assert_eq!(track.history().len(), 6);
    }

    #[test]
    fn test_failed_prediction_still_grows_history() {
        let mut track = Track::new(state(0.2), 0);
        let mut failing = |_: &[State]| -> crate::error::Result<Vector4<f64>> {
            Err(Error::predictor("model unavailable"))
        };

        assert!(track.predict(&mut failing).is_err());
        assert_eq!(track.history(), &[state(0.2), state(0.2)]);
        assert_eq!(track.time_since_update(), 1);
    }
}
