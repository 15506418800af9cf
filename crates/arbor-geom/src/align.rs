use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Stacking or flow direction.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Orientation {
    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Horizontal" => Ok(Self::Horizontal),
            "Vertical" => Ok(Self::Vertical),
            _ => Err(Error::Parse(format!("invalid orientation {s:?}"))),
        }
    }
}

/// Horizontal placement inside a parent's client area.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Flush left.
    Left,
    /// Flush right.
    Right,
    /// Centered.
    #[default]
    Center,
}

/// Vertical placement inside a parent's client area.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Flush top.
    Top,
    /// Flush bottom.
    Bottom,
    /// Centered.
    #[default]
    Center,
}

/// A nine-way placement, used for docking positions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Top edge.
    Top,
    /// Left edge.
    Left,
    /// Top-left corner.
    TopLeft,
    /// Right edge.
    Right,
    /// Top-right corner.
    TopRight,
    /// Bottom edge.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Center.
    #[default]
    Center,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Top => "Top",
            Self::Left => "Left",
            Self::TopLeft => "TopLeft",
            Self::Right => "Right",
            Self::TopRight => "TopRight",
            Self::Bottom => "Bottom",
            Self::BottomLeft => "BottomLeft",
            Self::BottomRight => "BottomRight",
            Self::Center => "Center",
        };
        f.write_str(s)
    }
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "Top" => Self::Top,
            "Left" => Self::Left,
            "TopLeft" => Self::TopLeft,
            "Right" => Self::Right,
            "TopRight" => Self::TopRight,
            "Bottom" => Self::Bottom,
            "BottomLeft" => Self::BottomLeft,
            "BottomRight" => Self::BottomRight,
            "Center" => Self::Center,
            _ => return Err(Error::Parse(format!("invalid alignment {s:?}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text() -> Result<()> {
        assert_eq!("Vertical".parse::<Orientation>()?, Orientation::Vertical);
        assert_eq!(Orientation::Horizontal.cross(), Orientation::Vertical);
        assert_eq!("BottomLeft".parse::<Alignment>()?, Alignment::BottomLeft);
        assert_eq!(Alignment::TopRight.to_string(), "TopRight");
        assert!("Diagonal".parse::<Alignment>().is_err());
        Ok(())
    }
}
