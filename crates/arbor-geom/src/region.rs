use super::{Point, Rect};

/// How a rectangle relates to the area covered by a `Region`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The rectangle is entirely covered.
    In,
    /// The rectangle shares no area with the region.
    Out,
    /// The rectangle is partly covered.
    Part,
}

/// A set of pairwise non-overlapping rectangles tracking an area that needs
/// repainting. The covered area is exactly the union of everything added since
/// the last reset, minus anything subtracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    /// Disjoint member rectangles.
    rects: Vec<Rect>,
}

impl Region {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Does the region cover nothing?
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Drop all coverage.
    pub fn reset(&mut self) {
        self.rects.clear();
    }

    /// The member rectangles.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Total covered area.
    pub fn area(&self) -> i64 {
        self.rects.iter().map(|r| r.size().area()).sum()
    }

    /// Bounding box of the covered area, or `None` if empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.rects.iter().copied().reduce(|a, b| a.bounds_union(b))
    }

    /// Add a rectangle. Only the part not already covered is stored.
    pub fn union_rect(&mut self, r: Rect) {
        if r.is_empty() {
            return;
        }
        let mut pieces = vec![r];
        for existing in &self.rects {
            if pieces.is_empty() {
                return;
            }
            pieces = pieces.iter().flat_map(|p| p.minus(*existing)).collect();
        }
        self.rects.extend(pieces);
    }

    /// Add every rectangle of another region.
    pub fn union(&mut self, other: &Self) {
        for r in &other.rects {
            self.union_rect(*r);
        }
    }

    /// Remove the area of a rectangle from the region.
    pub fn subtract_rect(&mut self, r: Rect) {
        if r.is_empty() {
            return;
        }
        self.rects = self.rects.iter().flat_map(|e| e.minus(r)).collect();
    }

    /// The part of the region that falls inside `r`.
    pub fn intersect_rect(&self, r: Rect) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .filter_map(|e| e.intersection(r))
                .collect(),
        }
    }

    /// Classify a rectangle against the covered area.
    pub fn contains(&self, r: Rect) -> Overlap {
        let covered: i64 = self
            .rects
            .iter()
            .filter_map(|e| e.intersection(r))
            .map(|i| i.size().area())
            .sum();
        if covered == 0 {
            Overlap::Out
        } else if covered == r.size().area() {
            Overlap::In
        } else {
            Overlap::Part
        }
    }

    /// Is the point inside one of the member rectangles? Right and bottom
    /// edges are exclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        self.rects
            .iter()
            .any(|r| p.x >= r.x && p.x < r.right() && p.y >= r.y && p.y < r.bottom())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn union_and_classify() {
        let mut r = Region::new();
        assert!(r.is_empty());
        assert_eq!(r.contains(Rect::new(0, 0, 5, 5)), Overlap::Out);

        r.union_rect(Rect::new(0, 0, 10, 10));
        r.union_rect(Rect::new(5, 5, 10, 10));
        assert_eq!(r.area(), 100 + 100 - 25);
        assert_eq!(r.bounds(), Some(Rect::new(0, 0, 15, 15)));
        assert_eq!(r.contains(Rect::new(1, 1, 3, 3)), Overlap::In);
        assert_eq!(r.contains(Rect::new(8, 0, 4, 4)), Overlap::Part);
        assert_eq!(r.contains(Rect::new(11, 0, 4, 4)), Overlap::Out);

        r.union_rect(Rect::new(2, 2, 2, 2));
        assert_eq!(r.area(), 175);

        r.reset();
        assert!(r.is_empty());
        assert_eq!(r.bounds(), None);
    }

    #[test]
    fn subtract_and_intersect() {
        let mut r = Region::new();
        r.union_rect(Rect::new(0, 0, 10, 10));
        r.subtract_rect(Rect::new(0, 0, 5, 10));
        assert_eq!(r.area(), 50);
        assert!(!r.contains_point(Point::new(2, 2)));
        assert!(r.contains_point(Point::new(7, 2)));

        let i = r.intersect_rect(Rect::new(8, 8, 10, 10));
        assert_eq!(i.area(), 4);
        assert_eq!(i.contains(Rect::new(8, 8, 2, 2)), Overlap::In);
    }

    #[test]
    fn empty_rects_ignored() {
        let mut r = Region::new();
        r.union_rect(Rect::new(3, 3, 0, 10));
        r.union_rect(Rect::new(3, 3, -4, 10));
        assert!(r.is_empty());
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-20i32..20, -20i32..20, 0i32..15, 0i32..15).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn coverage_matches_cells(
            adds in prop::collection::vec(rect_strategy(), 0..8),
            subs in prop::collection::vec(rect_strategy(), 0..3),
        ) {
            let mut region = Region::new();
            for r in &adds {
                region.union_rect(*r);
            }
            for r in &subs {
                region.subtract_rect(*r);
            }

            let rects = region.rects();
            for (i, a) in rects.iter().enumerate() {
                for b in &rects[i + 1..] {
                    prop_assert!(!a.intersects(*b));
                }
            }

            let inside = |r: &Rect, x: i32, y: i32| x >= r.x && x < r.right() && y >= r.y && y < r.bottom();
            let mut cells = 0i64;
            for x in -20..35 {
                for y in -20..35 {
                    let expected = adds.iter().any(|r| inside(r, x, y))
                        && !subs.iter().any(|r| inside(r, x, y));
                    prop_assert_eq!(region.contains_point(Point::new(x, y)), expected);
                    if expected {
                        cells += 1;
                    }
                }
            }
            prop_assert_eq!(region.area(), cells);
        }

        #[test]
        fn added_rects_are_covered(adds in prop::collection::vec(rect_strategy(), 1..6)) {
            let mut region = Region::new();
            for r in &adds {
                region.union_rect(*r);
            }
            for r in adds.iter().filter(|r| !r.is_empty()) {
                prop_assert_eq!(region.contains(*r), Overlap::In);
            }
        }
    }
}
