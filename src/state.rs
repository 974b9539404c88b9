use nalgebra::{SVector, Vector4};
use serde::{Deserialize, Serialize};

use crate::{
    bbox::BBox,
    error::{Error, Result},
};

/// Normalized track state:
/// `[x_1/w, y_1/h, box_w/w, box_h/h, fps/max_fps, w/max_w, h/max_h]`.
///
/// The first four entries describe the box, the last three the sequence the
/// box was observed in.
pub type State = SVector<f64, 7>;

/// Number of leading state entries that describe the box itself.
pub const BOX_FEATURES: usize = 4;

/// Frame size and rate of the sequence being tracked, together with the
/// dataset-wide maxima used to normalize them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: f64,
    pub height: f64,
    pub fps: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub max_fps: f64,
}

impl FrameGeometry {
    pub fn new(
        width: f64,
        height: f64,
        fps: f64,
        max_width: f64,
        max_height: f64,
        max_fps: f64,
    ) -> Result<Self> {
        let geometry = Self {
            width,
            height,
            fps,
            max_width,
            max_height,
            max_fps,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Geometry of a single sequence that is its own dataset maximum.
    pub fn single(width: f64, height: f64, fps: f64) -> Result<Self> {
        Self::new(width, height, fps, width, height, fps)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width, self.max_width),
            ("height", self.height, self.max_height),
            ("fps", self.fps, self.max_fps),
        ];
        for (name, value, max) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
            if !(max.is_finite() && max > 0.0) {
                return Err(Error::config(format!(
                    "max_{name} must be finite and positive, got {max}"
                )));
            }
            if value > max {
                return Err(Error::config(format!(
                    "{name} ({value}) exceeds max_{name} ({max})"
                )));
            }
        }
        Ok(())
    }

    /// The three trailing state entries shared by every box of this sequence.
    pub fn context(&self) -> [f64; 3] {
        [
            self.fps / self.max_fps,
            self.width / self.max_width,
            self.height / self.max_height,
        ]
    }

    pub fn to_normalized(&self, bbox: &BBox) -> State {
        let [fps, width, height] = self.context();
        State::from([
            bbox.x_1 / self.width,
            bbox.y_1 / self.height,
            bbox.width() / self.width,
            bbox.height() / self.height,
            fps,
            width,
            height,
        ])
    }

    /// Only the four box entries are read; the sequence context is ignored.
    ///
    /// Plain arithmetic: predicted boxes with a negative or non-finite size
    /// come back as they are, so callers can reject them.
    pub fn to_bbox(&self, state: &State) -> BBox {
        let x_1 = state[0] * self.width;
        let y_1 = state[1] * self.height;

        BBox {
            x_1,
            y_1,
            x_2: x_1 + state[2] * self.width,
            y_2: y_1 + state[3] * self.height,
        }
    }
}

/// Joins predicted box features with the sequence context of `reference`.
pub fn with_context(box_features: &Vector4<f64>, reference: &State) -> State {
    let mut state = *reference;
    state
        .fixed_rows_mut::<BOX_FEATURES>(0)
        .copy_from(box_features);
    state
}

/// The four box entries of a state.
pub fn box_features(state: &State) -> Vector4<f64> {
    state.fixed_rows::<BOX_FEATURES>(0).clone_owned()
}
