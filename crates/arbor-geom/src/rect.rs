use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use super::{Orientation, Point, Size};
use crate::{Error, Result};

/// A rectangle with a signed origin and signed size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle from a position and a size.
    pub fn from_parts(p: Point, s: Size) -> Self {
        Self::new(p.x, p.y, s.w, s.h)
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dimensions of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// One past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Does this rectangle have no area?
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Is either dimension negative? A negative dimension marks an unresolved
    /// layout value.
    pub fn is_negative(&self) -> bool {
        self.w < 0 || self.h < 0
    }

    /// Grow every side by `delta`. Negative values shrink the rectangle.
    pub fn inflated(&self, delta: i32) -> Self {
        Self {
            x: self.x - delta,
            y: self.y - delta,
            w: self.w + 2 * delta,
            h: self.h + 2 * delta,
        }
    }

    /// Does the rectangle contain the point? Edges are inclusive on all sides.
    pub fn contains_or_equal(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Does this rectangle completely enclose the other?
    pub fn contains_rect(&self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Do the two rectangles share a region of non-zero area?
    pub fn intersects(&self, other: Self) -> bool {
        self.x.max(other.x) < self.right().min(other.right())
            && self.y.max(other.y) < self.bottom().min(other.bottom())
    }

    /// The overlapping part of two rectangles, if any.
    pub fn intersection(&self, other: Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Self {
            x,
            y,
            w: self.right().min(other.right()) - x,
            h: self.bottom().min(other.bottom()) - y,
        })
    }

    /// The smallest rectangle enclosing both.
    pub fn bounds_union(&self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// The parts of this rectangle not covered by `other`, as at most four
    /// non-overlapping bands.
    pub fn minus(&self, other: Self) -> Vec<Self> {
        let Some(i) = self.intersection(other) else {
            return if self.is_empty() { vec![] } else { vec![*self] };
        };
        let mut out = Vec::with_capacity(4);
        if i.y > self.y {
            out.push(Self::new(self.x, self.y, self.w, i.y - self.y));
        }
        if i.bottom() < self.bottom() {
            out.push(Self::new(
                self.x,
                i.bottom(),
                self.w,
                self.bottom() - i.bottom(),
            ));
        }
        if i.x > self.x {
            out.push(Self::new(self.x, i.y, i.x - self.x, i.h));
        }
        if i.right() < self.right() {
            out.push(Self::new(i.right(), i.y, self.right() - i.right(), i.h));
        }
        out
    }

    /// The offset along an axis.
    pub fn pos_along(&self, o: Orientation) -> i32 {
        match o {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// The extent along an axis.
    pub fn len_along(&self, o: Orientation) -> i32 {
        match o {
            Orientation::Horizontal => self.w,
            Orientation::Vertical => self.h,
        }
    }

    /// Mutable offset along an axis.
    pub fn pos_along_mut(&mut self, o: Orientation) -> &mut i32 {
        match o {
            Orientation::Horizontal => &mut self.x,
            Orientation::Vertical => &mut self.y,
        }
    }

    /// Mutable extent along an axis.
    pub fn len_along_mut(&mut self, o: Orientation) -> &mut i32 {
        match o {
            Orientation::Horizontal => &mut self.w,
            Orientation::Vertical => &mut self.h,
        }
    }
}

impl Add<Point> for Rect {
    type Output = Self;

    fn add(self, p: Point) -> Self {
        Self::new(self.x + p.x, self.y + p.y, self.w, self.h)
    }
}

impl Sub<Point> for Rect {
    type Output = Self;

    fn sub(self, p: Point) -> Self {
        Self::new(self.x - p.x, self.y - p.y, self.w, self.h)
    }
}

impl From<Size> for Rect {
    fn from(s: Size) -> Self {
        s.rect()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.w, self.h)
    }
}

impl FromStr for Rect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<i32>()
                    .map_err(|_| Error::Parse(format!("invalid rectangle component {p:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        match parts.as_slice() {
            [x, y, w, h] => Ok(Self::new(*x, *y, *w, *h)),
            _ => Err(Error::Parse(format!("expected x,y,w,h, got {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() -> Result<()> {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_or_equal(Point::new(10, 10)));
        assert!(r.contains_or_equal(Point::new(20, 20)));
        assert!(!r.contains_or_equal(Point::new(21, 20)));
        assert!(!r.contains_or_equal(Point::new(9, 15)));

        assert!(r.contains_rect(Rect::new(10, 10, 10, 10)));
        assert!(r.contains_rect(Rect::new(12, 12, 2, 2)));
        assert!(!r.contains_rect(Rect::new(12, 12, 10, 2)));
        Ok(())
    }

    #[test]
    fn intersect() -> Result<()> {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(Rect::new(5, 5, 10, 10)));
        // Touching edges do not intersect.
        assert!(!a.intersects(Rect::new(10, 0, 5, 5)));
        assert_eq!(
            a.intersection(Rect::new(5, -5, 10, 10)),
            Some(Rect::new(5, 0, 5, 5))
        );
        assert_eq!(a.intersection(Rect::new(20, 20, 1, 1)), None);
        assert_eq!(
            a.bounds_union(Rect::new(20, 20, 1, 1)),
            Rect::new(0, 0, 21, 21)
        );
        Ok(())
    }

    #[test]
    fn minus() -> Result<()> {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.minus(Rect::new(20, 20, 5, 5)), vec![a]);
        assert!(a.minus(Rect::new(-1, -1, 20, 20)).is_empty());
        let parts = a.minus(Rect::new(3, 3, 4, 4));
        assert_eq!(parts.len(), 4);
        let area: i64 = parts.iter().map(|r| r.size().area()).sum();
        assert_eq!(area, 100 - 16);
        for (i, p) in parts.iter().enumerate() {
            for q in &parts[i + 1..] {
                assert!(!p.intersects(*q));
            }
        }
        Ok(())
    }

    #[test]
    fn inflate_and_translate() -> Result<()> {
        let r = Rect::new(0, 0, 100, 50);
        assert_eq!(r.inflated(-5), Rect::new(5, 5, 90, 40));
        assert_eq!(r + Point::new(3, 4), Rect::new(3, 4, 100, 50));
        assert_eq!(r - Point::new(3, 4), Rect::new(-3, -4, 100, 50));
        assert!(Rect::new(0, 0, -1, 4).is_negative());
        Ok(())
    }

    #[test]
    fn text() -> Result<()> {
        let r = Rect::new(1, -2, 30, 40);
        assert_eq!(r.to_string(), "1,-2,30,40");
        assert_eq!("1,-2,30,40".parse::<Rect>()?, r);
        assert!("1,2,3".parse::<Rect>().is_err());
        assert!("a,b,c,d".parse::<Rect>().is_err());
        Ok(())
    }
}
