use itertools::Itertools;
use nalgebra::DMatrix;
use pathfinding::prelude::{Matrix, kuhn_munkres};

use crate::bbox::BBox;

// kuhn_munkres works on integer weights, so scores are rescaled so that the
// largest one maps to this value before solving.
const SCORE_RESOLUTION: f64 = 1e9;

/// Outcome of associating one frame's detections with the live tracks.
///
/// Indices refer to positions in the detection and predicted-box slices
/// handed to [`associate_detections_to_tracks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    /// Accepted `(detection_index, track_index)` pairs.
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_tracks: Vec<usize>,
}

/// Associates detections with predicted track boxes.
///
/// ## Args
///  - detections: This frame's detection boxes.
///  - predicted_boxes: One predicted box per track taking part in association.
///  - iou_threshold: The minimum iou score needed for a valid association.
///
/// Solver pairs scoring below `iou_threshold` are demoted: both their
/// detection and their track end up unmatched.
pub fn associate_detections_to_tracks(
    detections: &[BBox],
    predicted_boxes: &[BBox],
    iou_threshold: f64,
) -> Association {
    if predicted_boxes.is_empty() || detections.is_empty() {
        return Association {
            matches: Vec::new(),
            unmatched_detections: (0..detections.len()).collect(),
            unmatched_tracks: (0..predicted_boxes.len()).collect(),
        };
    }

    let iou_matrix = calc_iou_matrix(detections, predicted_boxes);
    let assignment = solve_assignment(&iou_matrix);

    let mut unmatched_detections = (0..detections.len())
        .filter(|detection_index| !assignment.iter().any(|(d, _)| d == detection_index))
        .collect_vec();
    let mut unmatched_tracks = (0..predicted_boxes.len())
        .filter(|track_index| !assignment.iter().any(|(_, t)| t == track_index))
        .collect_vec();

    let mut matches = Vec::with_capacity(assignment.len());

    for (detection_index, track_index) in assignment {
        if iou_matrix[(detection_index, track_index)] < iou_threshold {
            unmatched_detections.push(detection_index);
            unmatched_tracks.push(track_index);
            continue;
        }
        matches.push((detection_index, track_index));
    }

    Association {
        matches,
        unmatched_detections,
        unmatched_tracks,
    }
}

/// Builds the `detections x tracks` matrix of pairwise iou scores. Either
/// side may be empty.
pub fn calc_iou_matrix(bboxes_1: &[BBox], bboxes_2: &[BBox]) -> DMatrix<f64> {
    DMatrix::from_fn(bboxes_1.len(), bboxes_2.len(), |i, j| {
        bboxes_1[i].iou(&bboxes_2[j])
    })
}

/// Finds the row/column pairing with the largest total score.
///
/// Scores must be finite and non-negative. Exactly `min(rows, columns)` pairs
/// are returned, sorted by row, so a matrix without rows or columns yields
/// none. Among equally good pairings the one found by `pathfinding`'s
/// Kuhn-Munkres implementation wins.
pub fn solve_assignment(scores: &DMatrix<f64>) -> Vec<(usize, usize)> {
    if scores.nrows() == 0 || scores.ncols() == 0 {
        return Vec::new();
    }
    debug_assert!(
        scores.iter().all(|score| score.is_finite() && *score >= 0.0),
        "assignment scores must be finite and non-negative"
    );

    let max_score = scores.iter().copied().fold(0.0, f64::max);
    let scale = if max_score > 0.0 {
        SCORE_RESOLUTION / max_score
    } else {
        0.0
    };

    // kuhn_munkres requires at least as many columns as rows.
    let transpose = scores.nrows() > scores.ncols();
    let oriented = if transpose {
        scores.transpose()
    } else {
        scores.clone()
    };
    let mut weights = Matrix::new(oriented.nrows(), oriented.ncols(), 0_i64);
    for (row, column) in (0..oriented.nrows()).cartesian_product(0..oriented.ncols()) {
        weights[(row, column)] = (oriented[(row, column)] * scale).round() as i64;
    }

    let (_, assignment_vector) = kuhn_munkres(&weights);

    assignment_vector
        .into_iter()
        .enumerate()
        .map(|(i, j)| if transpose { (j, i) } else { (i, j) })
        .sorted()
        .collect()
}
