use float_ord::FloatOrd;
use geo::{BoundingRect, Coord, MultiPoint};
use tracing::instrument;

use crate::Fragment;

/// Spans and maxima are never below `1.0`, so they are always safe divisors. When no fragment
/// carries geometry the extrema are all `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub width_span: f32,
    pub height_span: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl DocumentStats {
    #[instrument(level = "debug", skip(fragments), fields(count = fragments.len()))]
    pub fn collect(fragments: &[Fragment]) -> Self {
        // The union of all fragment boxes is the box around every vertex.
        let union = fragments
            .iter()
            .flat_map(|fragment| fragment.vertices.iter().copied().map(Coord::from))
            .collect::<MultiPoint<f32>>()
            .bounding_rect();
        let (min, max) = union
            .map(|rect| (rect.min(), rect.max()))
            .unwrap_or((Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }));

        let boxes = fragments
            .iter()
            .filter_map(Fragment::bounding_box)
            .collect::<Vec<_>>();
        let max_width = boxes
            .iter()
            .map(|it| FloatOrd(it.width()))
            .max()
            .map_or(0.0, |it| it.0);
        let max_height = boxes
            .iter()
            .map(|it| FloatOrd(it.height()))
            .max()
            .map_or(0.0, |it| it.0);

        let stats = Self {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
            width_span: (max.x - min.x).max(1.0),
            height_span: (max.y - min.y).max(1.0),
            max_width: max_width.max(1.0),
            max_height: max_height.max(1.0),
        };
        log::debug!(
            "Collected stats from {} of {} fragments: {stats:?}",
            boxes.len(),
            fragments.len()
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_unit_spans() {
        let stats = DocumentStats::collect(&[]);
        assert_eq!(stats.min_x, 0.0);
        assert_eq!(stats.max_x, 0.0);
        assert_eq!(stats.min_y, 0.0);
        assert_eq!(stats.max_y, 0.0);
        assert_eq!(stats.width_span, 1.0);
        assert_eq!(stats.height_span, 1.0);
        assert_eq!(stats.max_width, 1.0);
        assert_eq!(stats.max_height, 1.0);
    }

    #[test]
    fn fragments_without_geometry_are_ignored() {
        let stats = DocumentStats::collect(&[
            Fragment::new("floating", []),
            Fragment::from_rect("a", 10.0, 20.0, 30.0, 5.0),
        ]);
        assert_eq!(stats.min_x, 10.0);
        assert_eq!(stats.max_x, 40.0);
        assert_eq!(stats.min_y, 20.0);
        assert_eq!(stats.max_y, 25.0);
        assert_eq!(stats.width_span, 30.0);
        assert_eq!(stats.height_span, 5.0);
    }

    #[test]
    fn union_and_maxima_come_from_different_fragments() {
        let stats = DocumentStats::collect(&[
            Fragment::from_rect("wide", 0.0, 0.0, 200.0, 10.0),
            Fragment::from_rect("tall", 300.0, 50.0, 20.0, 120.0),
        ]);
        assert_eq!(stats.width_span, 320.0);
        assert_eq!(stats.height_span, 170.0);
        assert_eq!(stats.max_width, 200.0);
        assert_eq!(stats.max_height, 120.0);
    }

    #[test]
    fn degenerate_document_is_floored() {
        let stats = DocumentStats::collect(&[Fragment::new(
            "dot",
            [crate::Vertex::new(5.0, 5.0)],
        )]);
        assert_eq!(stats.min_x, 5.0);
        assert_eq!(stats.max_y, 5.0);
        assert_eq!(stats.width_span, 1.0);
        assert_eq!(stats.height_span, 1.0);
        assert_eq!(stats.max_width, 1.0);
        assert_eq!(stats.max_height, 1.0);
    }
}
