//! Recursive binary space partitioning with one room per leaf region.

use log::debug;
use rand_chacha::ChaCha8Rng;

use super::{Fractor, random_rect_in_rect};
use crate::canvas::Canvas;
use crate::error::GenerationError;
use crate::geometry::{Edge, Rectangle, Size};
use crate::random::{coin_flip, random_in_range};

pub const DEFAULT_ROOM_SIZE: Size = Size::new(8, 8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitDirection {
    /// Cut with a horizontal line, stacking the halves top and bottom.
    Horizontal,
    /// Cut with a vertical line, placing the halves side by side.
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryPartitionFractor {
    minimum_size: Size,
    room_size: Size,
}

impl BinaryPartitionFractor {
    pub fn new(minimum_size: Size) -> Self {
        Self { minimum_size, room_size: DEFAULT_ROOM_SIZE }
    }

    pub fn with_room_size(mut self, room_size: Size) -> Self {
        self.room_size = room_size;
        self
    }

    pub fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    pub fn room_size(&self) -> Size {
        self.room_size
    }

    /// Splits `region` until no piece can be split again. The leaves tile `region` exactly.
    pub fn maximally_partition(&self, region: Rectangle, rng: &mut ChaCha8Rng) -> Vec<Rectangle> {
        let mut pending = vec![region];
        let mut leaves = Vec::new();

        while !pending.is_empty() {
            let mut next_round = Vec::new();
            for region in pending {
                match self.partition(region, rng) {
                    Some((first, second)) => next_round.extend([first, second]),
                    None => leaves.push(region),
                }
            }
            pending = next_round;
        }

        leaves
    }

    /// One split of `region`, or `None` if it is a leaf.
    pub fn partition(
        &self,
        region: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Option<(Rectangle, Rectangle)> {
        // Widened so that huge minimum sizes read as "not splittable" instead of overflowing.
        let can_split_horizontally =
            i64::from(region.height()) >= i64::from(self.minimum_size.height) * 2;
        let can_split_vertically =
            i64::from(region.width()) >= i64::from(self.minimum_size.width) * 2;

        let direction = match (can_split_horizontally, can_split_vertically) {
            (false, false) => return None,
            (true, false) => SplitDirection::Horizontal,
            (false, true) => SplitDirection::Vertical,
            (true, true) => {
                if coin_flip(rng) {
                    SplitDirection::Horizontal
                } else {
                    SplitDirection::Vertical
                }
            }
        };

        match direction {
            SplitDirection::Horizontal => split_along(
                region,
                rng,
                (region.top(), region.bottom()),
                self.minimum_size.height,
                [Edge::Bottom, Edge::Top],
            ),
            SplitDirection::Vertical => split_along(
                region,
                rng,
                (region.left(), region.right()),
                self.minimum_size.width,
                [Edge::Right, Edge::Left],
            ),
        }
    }
}

/// Cuts the span `low_edge..=high_edge` of `region`; `[near, far]` are the edges moved on the
/// first and second half.
fn split_along(
    region: Rectangle,
    rng: &mut ChaCha8Rng,
    (low_edge, high_edge): (i32, i32),
    minimum: i32,
    [near, far]: [Edge; 2],
) -> Option<(Rectangle, Rectangle)> {
    // The midpoint is the last row (or column) of the first half.
    let low = i64::from(low_edge) + i64::from(minimum) - 1;
    let high = i64::from(high_edge) - i64::from(minimum);
    if low > high {
        return None;
    }
    let (low, high) = (i32::try_from(low).ok()?, i32::try_from(high).ok()?);

    let midpoint = random_in_range(rng, low, high);
    let first = region.replace(near, midpoint)?;
    let second = region.replace(far, midpoint + 1)?;
    Some((first, second))
}

impl Fractor for BinaryPartitionFractor {
    fn populate(
        &mut self,
        canvas: &mut Canvas,
        region: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError> {
        let leaves = self.maximally_partition(region, rng);
        debug!("partitioned {region} into {} leaves", leaves.len());

        for leaf in leaves {
            let room = random_rect_in_rect(leaf, self.room_size, rng)?;
            canvas.draw_room(room, rng)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::entity::EntityKind;
    use crate::geometry::Point;

    fn assert_exact_tiling(region: Rectangle, leaves: &[Rectangle]) {
        let covered: usize = leaves.iter().map(|leaf| leaf.area()).sum();
        assert_eq!(covered, region.area(), "leaf areas must add up to the region");

        let mut hits = vec![0_u8; region.area()];
        for leaf in leaves {
            assert!(region.contains_rect(*leaf), "{leaf} escaped {region}");
            for point in leaf.iter_points() {
                let index = region.index_of(point).expect("inside region");
                hits[index] += 1;
            }
        }
        assert!(hits.iter().all(|&count| count == 1), "every point must be covered once");
        for (index, leaf) in leaves.iter().enumerate() {
            for other in &leaves[index + 1..] {
                assert!(!leaf.intersects(*other), "{leaf} overlaps {other}");
            }
        }
    }

    #[test]
    fn small_region_is_a_single_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let fractor = BinaryPartitionFractor::new(Size::new(10, 10));
        let region = Rectangle::new(Point::origin(), Size::new(19, 19));
        assert_eq!(fractor.partition(region, &mut rng), None);
        assert_eq!(fractor.maximally_partition(region, &mut rng), vec![region]);
    }

    #[test]
    fn exactly_twice_minimum_splits_in_the_middle() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let fractor = BinaryPartitionFractor::new(Size::new(10, 10));
        let region = Rectangle::new(Point::new(3, 0), Size::new(20, 5));
        let (left, right) = fractor.partition(region, &mut rng).expect("wide enough");
        assert_eq!(left, Rectangle::new(Point::new(3, 0), Size::new(10, 5)));
        assert_eq!(right, Rectangle::new(Point::new(13, 0), Size::new(10, 5)));
    }

    #[test]
    fn standard_map_partitions_into_minimum_sized_leaves() {
        let fractor = BinaryPartitionFractor::new(Size::new(10, 10));
        let region = Rectangle::new(Point::origin(), Size::new(80, 24));
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let leaves = fractor.maximally_partition(region, &mut rng);
            assert!(leaves.len() >= 2);
            assert_exact_tiling(region, &leaves);
            for leaf in &leaves {
                assert!(leaf.width() >= 10 && leaf.height() >= 10, "{leaf} is undersized");
                assert!(leaf.width() < 20 && leaf.height() < 20, "{leaf} could still split");
            }
        }
    }

    #[test]
    fn populate_draws_a_room_per_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut canvas = Canvas::with_size(Size::new(40, 12));
        let mut fractor = BinaryPartitionFractor::new(Size::new(10, 10));
        let region = canvas.bounds();
        fractor.populate(&mut canvas, region, &mut rng).expect("rooms fit");

        let walls = canvas
            .bounds()
            .iter_points()
            .filter(|&point| canvas.terrain(point).is_some_and(|d| d.kind() == EntityKind::Wall))
            .count();
        // Each 8x8 room contributes a 28-point frame; rooms never overlap.
        assert_eq!(walls % 28, 0);
        assert!(walls >= 28 * 2);
    }

    #[test]
    fn room_larger_than_leaf_is_a_bounds_violation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut canvas = Canvas::with_size(Size::new(12, 12));
        let mut fractor =
            BinaryPartitionFractor::new(Size::new(4, 4)).with_room_size(Size::new(8, 8));
        let region = canvas.bounds();
        let err = fractor.populate(&mut canvas, region, &mut rng).expect_err("too big");
        assert!(matches!(err, GenerationError::BoundsViolation { .. }));
    }

    #[test]
    fn huge_minimum_size_leaves_the_region_whole() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let minimum = Size::new(1_500_000_000, 1_500_000_000);
        let fractor = BinaryPartitionFractor::new(minimum);
        assert_eq!(fractor.minimum_size(), minimum);
        assert_eq!(fractor.room_size(), DEFAULT_ROOM_SIZE);

        let region = Rectangle::new(Point::origin(), Size::new(80, 24));
        assert_eq!(fractor.partition(region, &mut rng), None);
        assert_eq!(fractor.maximally_partition(region, &mut rng), vec![region]);

        let huge = Rectangle::new(Point::new(-5, -5), Size::new(i32::MAX - 10, 3));
        assert_eq!(fractor.partition(huge, &mut rng), None);
    }

    #[test]
    fn accessors_reflect_configuration() {
        let fractor =
            BinaryPartitionFractor::new(Size::new(6, 7)).with_room_size(Size::new(4, 5));
        assert_eq!(fractor.minimum_size(), Size::new(6, 7));
        assert_eq!(fractor.room_size(), Size::new(4, 5));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn leaves_tile_the_region_and_respect_minimum_size(
            seed in any::<u64>(),
            left in -20_i32..20,
            top in -20_i32..20,
            width in 1_i32..90,
            height in 1_i32..60,
            minimum_width in 1_i32..15,
            minimum_height in 1_i32..15,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let region = Rectangle::new(Point::new(left, top), Size::new(width, height));
            let fractor = BinaryPartitionFractor::new(Size::new(minimum_width, minimum_height));
            let leaves = fractor.maximally_partition(region, &mut rng);

            assert_exact_tiling(region, &leaves);
            for leaf in &leaves {
                if leaf != &region {
                    prop_assert!(leaf.width() >= minimum_width.min(width));
                    prop_assert!(leaf.height() >= minimum_height.min(height));
                }
            }
        }
    }
}
