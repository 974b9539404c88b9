use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates, top-left `(x_1, y_1)` to
/// bottom-right `(x_2, y_2)`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_1: f64,
    pub y_1: f64,
    pub x_2: f64,
    pub y_2: f64,
}

impl BBox {
    /// Inverted corners collapse to the zero box. Non-finite corners are kept
    /// as-is so callers can detect them with [`BBox::is_finite`].
    pub fn new(x_1: f64, y_1: f64, x_2: f64, y_2: f64) -> Self {
        if x_1 > x_2 || y_1 > y_2 {
            return BBox::default();
        };
        BBox { x_1, y_1, x_2, y_2 }
    }

    pub fn from_array(coords: [f64; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x_1, self.y_1, self.x_2, self.y_2]
    }

    pub fn width(&self) -> f64 {
        self.x_2 - self.x_1
    }

    pub fn height(&self) -> f64 {
        self.y_2 - self.y_1
    }

    /// Inverted boxes have no area.
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }

    /// Intersection over union. Both boxes are expected to have positive area;
    /// a zero union yields 0.
    pub fn iou(&self, other: &Self) -> f64 {
        let iwidth = (self.x_2.min(other.x_2) - self.x_1.max(other.x_1)).max(0.0);
        let iheight = (self.y_2.min(other.y_2) - self.y_1.max(other.y_1)).max(0.0);
        let iarea = iwidth * iheight;

        let union = self.area() + other.area() - iarea;

        if union == 0.0 {
            return 0.0;
        }

        iarea / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_new_bbox_returns_zero_bbox() {
        let bbox = BBox::new(3.0, 4.0, 2.0, 5.0);

        assert_eq!(bbox, BBox::default());
    }

    #[test]
    fn test_non_finite_bbox_is_kept_and_flagged() {
        let bbox = BBox::new(f64::NAN, 1.0, 2.0, 3.0);

        assert!(bbox.x_1.is_nan());
        assert!(!bbox.is_finite());
        assert!(BBox::new(0.0, 0.0, 1.0, 1.0).is_finite());
    }

    #[test]
    fn test_iou_returns_correct_value_1() {
        let bbox_1 = BBox::new(1.0, 1.0, 2.0, 2.0);
        let bbox_2 = BBox::new(1.0, 1.0, 1.5, 1.5);

        assert_eq!(bbox_1.iou(&bbox_2), 0.25)
    }

    #[test]
    fn test_iou_of_disjoint_boxes_is_zero() {
        let bbox_1 = BBox::new(0.0, 0.0, 1.0, 2.0);
        let bbox_2 = BBox::new(1.0, 2.0, 3.0, 3.0);
        let bbox_3 = BBox::new(10.0, 10.0, 12.0, 12.0);

        assert_eq!(bbox_1.iou(&bbox_2), 0.0);
        assert_eq!(bbox_1.iou(&bbox_3), 0.0);
    }

    #[test]
    fn test_iou_returns_correct_value_3() {
        let bbox_1 = BBox::new(0.0, 0.0, 3.0, 3.0);
        let bbox_2 = BBox::new(1.0, 1.0, 2.0, 2.0);

        assert_eq!(bbox_1.iou(&bbox_2), 1.0 / 9.0)
    }

    #[test]
    fn test_iou_with_itself_is_one() {
        let bbox = BBox::new(10.0, 10.0, 50.0, 50.0);

        assert_eq!(bbox.iou(&bbox), 1.0);
    }

    #[test]
    fn test_iou_is_symmetric() {
        let bbox_1 = BBox::new(0.0, 0.0, 4.0, 3.0);
        let bbox_2 = BBox::new(1.5, 0.5, 6.0, 7.0);

        assert_eq!(bbox_1.iou(&bbox_2), bbox_2.iou(&bbox_1));
        assert!(bbox_1.iou(&bbox_2) > 0.0);
    }

    #[test]
    fn test_inverted_box_has_no_area() {
        let inverted = BBox {
            x_1: 5.0,
            y_1: 5.0,
            x_2: 2.0,
            y_2: 1.0,
        };

        assert_eq!(inverted.area(), 0.0);
        assert_eq!(inverted.iou(&BBox::new(0.0, 0.0, 6.0, 6.0)), 0.0);
    }

    #[test]
    fn test_zero_union_does_not_divide_by_zero() {
        let empty = BBox::new(1.0, 1.0, 1.0, 1.0);

        assert_eq!(empty.iou(&empty), 0.0);
    }
}
