use std::ops::{Add, Sub};

use super::{Orientation, Rect};

/// A width and height with no location. Signed, since an unresolved layout
/// dimension is carried as a negative value.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Size {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Size {
    /// Construct a new size.
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// A zero size.
    pub fn zero() -> Self {
        Self { w: 0, h: 0 }
    }

    /// The area of this size. Negative dimensions count as zero.
    pub fn area(&self) -> i64 {
        i64::from(self.w.max(0)) * i64::from(self.h.max(0))
    }

    /// Return a `Rect` with these dimensions located at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    /// The extent along an axis.
    pub fn along(&self, o: Orientation) -> i32 {
        match o {
            Orientation::Horizontal => self.w,
            Orientation::Vertical => self.h,
        }
    }

    /// Mutable access to the extent along an axis.
    pub fn along_mut(&mut self, o: Orientation) -> &mut i32 {
        match o {
            Orientation::Horizontal => &mut self.w,
            Orientation::Vertical => &mut self.h,
        }
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            w: self.w + other.w,
            h: self.h + other.h,
        }
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            w: self.w - other.w,
            h: self.h - other.h,
        }
    }
}

impl From<(i32, i32)> for Size {
    fn from(v: (i32, i32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}
