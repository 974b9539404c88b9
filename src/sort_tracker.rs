use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    associate::associate_detections_to_tracks,
    bbox::BBox,
    error::{Error, Result},
    predictor::Predictor,
    state::{FrameGeometry, State},
    track::Track,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    pub score: f64,
}

impl Detection {
    pub fn new(bbox: BBox, score: f64) -> Self {
        Self { bbox, score }
    }

    /// Reads an `[x_1, y_1, x_2, y_2, score]` row.
    pub fn from_array(row: [f64; 5]) -> Self {
        Self {
            bbox: BBox::new(row[0], row[1], row[2], row[3]),
            score: row[4],
        }
    }
}

/// A box emitted for one frame, carrying the 1-based track id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackOutput {
    pub bbox: BBox,
    pub id: u64,
}

impl TrackOutput {
    /// `[x_1, y_1, x_2, y_2, id]`
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.bbox.x_1,
            self.bbox.y_1,
            self.bbox.x_2,
            self.bbox.y_2,
            self.id as f64,
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Frames a track may go unmatched before it is removed.
    pub max_age: u32,
    /// Consecutive matches needed before a track is emitted.
    pub min_hits: u32,
    /// Minimum iou for a detection to be matched with a track.
    pub iou_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 1,
            min_hits: 3,
            iou_threshold: 0.3,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(Error::config(format!(
                "iou_threshold must lie in [0, 1], got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

/// Hands out track ids. Ids are never reused by the same generator.
///
/// Ids are `u64`, which a tracker creating a billion tracks per second
/// would take centuries to exhaust.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// SORT-style multi-object tracker whose motion model is the injected
/// [`Predictor`].
pub struct SortTracker<P> {
    predictor: P,
    config: TrackerConfig,
    geometry: FrameGeometry,
    tracks: Vec<Track>,
    ids: IdGenerator,
    frame_count: u64,
}

impl<P: Predictor> SortTracker<P> {
    pub fn new(config: TrackerConfig, geometry: FrameGeometry, predictor: P) -> Result<Self> {
        config.validate()?;
        geometry.validate()?;

        Ok(Self {
            predictor,
            config,
            geometry,
            tracks: Vec::new(),
            ids: IdGenerator::default(),
            frame_count: 0,
        })
    }

    /// Processes one frame and returns the boxes of the tracks to report.
    ///
    /// Must be called exactly once per frame, also for frames without
    /// detections; skipping frames or calling twice for one frame breaks the
    /// aging of tracks.
    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackOutput> {
        self.frame_count += 1;

        let (predicted_boxes, candidates) = self.predict_tracks();

        let detection_bboxes = detections.iter().map(|d| d.bbox).collect_vec();
        let detection_states = detection_bboxes
            .iter()
            .map(|bbox| self.geometry.to_normalized(bbox))
            .collect_vec();

        let association = associate_detections_to_tracks(
            &detection_bboxes,
            &predicted_boxes,
            self.config.iou_threshold,
        );

        for &(detection_index, candidate_index) in &association.matches {
            self.tracks[candidates[candidate_index]].update(detection_states[detection_index]);
        }

        for &detection_index in &association.unmatched_detections {
            let id = self.ids.next_id();
            log::trace!("frame {}: new track {}", self.frame_count, id + 1);
            self.tracks
                .push(Track::new(detection_states[detection_index], id));
        }

        let outputs = self.collect_outputs();
        self.remove_dead_tracks();

        log::debug!(
            "frame {}: {} detections, {} matched, {} tracks alive, {} reported",
            self.frame_count,
            detections.len(),
            association.matches.len(),
            self.tracks.len(),
            outputs.len()
        );

        outputs
    }

    /// Runs `predict` on every track. Returns the usable predicted boxes and,
    /// for each of them, the index of its track. Tracks whose prediction
    /// failed or is not finite sit out this frame's association.
    fn predict_tracks(&mut self) -> (Vec<BBox>, Vec<usize>) {
        let mut predicted_boxes = Vec::with_capacity(self.tracks.len());
        let mut candidates = Vec::with_capacity(self.tracks.len());

        for (index, track) in self.tracks.iter_mut().enumerate() {
            let bbox = match track.predict(&mut self.predictor) {
                Ok(state) => self.geometry.to_bbox(&state),
                Err(err) => {
                    log::warn!(
                        "frame {}: track {} excluded, {}",
                        self.frame_count,
                        track.id() + 1,
                        err
                    );
                    continue;
                }
            };
            if !bbox.is_finite() {
                log::warn!(
                    "frame {}: track {} excluded, non-finite prediction {:?}",
                    self.frame_count,
                    track.id() + 1,
                    bbox
                );
                continue;
            }
            predicted_boxes.push(bbox);
            candidates.push(index);
        }

        (predicted_boxes, candidates)
    }

    fn collect_outputs(&self) -> Vec<TrackOutput> {
        self.tracks
            .iter()
            .filter(|track| self.is_reported(track))
            .map(|track| TrackOutput {
                bbox: self.geometry.to_bbox(track.get_state()),
                id: track.id() + 1,
            })
            .collect()
    }

    fn is_reported(&self, track: &Track) -> bool {
        track.time_since_update() < 1
            && (track.hit_streak() >= self.config.min_hits
                || self.frame_count <= u64::from(self.config.min_hits))
    }

    fn remove_dead_tracks(&mut self) {
        let max_age = self.config.max_age;
        let frame_count = self.frame_count;
        self.tracks.retain(|track| {
            let alive = track.time_since_update() <= max_age;
            if !alive {
                log::trace!("frame {}: track {} removed", frame_count, track.id() + 1);
            }
            alive
        });
    }
}

impl<P> SortTracker<P> {
    /// Live tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get_states(&self) -> Vec<State> {
        self.tracks.iter().map(|track| *track.get_state()).collect()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Drops every track and restarts the frame count. Ids keep counting up.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.frame_count = 0;
    }
}
