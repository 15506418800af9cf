use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// A sizing policy for one axis of a widget.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Measure {
    /// A literal size in pixels.
    Fixed(i32),
    /// A percentage of the parent's client dimension. `Percent(100)` is
    /// always represented as `Stretched`.
    Percent(i32),
    /// Size to content.
    Fit,
    /// Fill the space the parent allocates.
    Stretched,
    /// Take the parent's policy.
    #[default]
    Inherit,
}

impl Measure {
    /// A percentage measure, normalising 100% to `Stretched`.
    pub fn percent(p: i32) -> Self {
        if p == 100 { Self::Stretched } else { Self::Percent(p) }
    }

    /// Is this a literal pixel size?
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Is this the size-to-content policy?
    pub fn is_fit(&self) -> bool {
        matches!(self, Self::Fit)
    }

    /// Is this a fill policy?
    pub fn is_stretched(&self) -> bool {
        matches!(self, Self::Stretched)
    }

    /// Does the resolved size depend on the parent's client size?
    pub fn is_relative_to_parent(&self) -> bool {
        matches!(self, Self::Percent(p) if *p >= 0) || self.is_stretched()
    }

    /// The percentage of a relative measure. `Stretched` reads as 100.
    pub fn percentage(&self) -> Option<i32> {
        match self {
            Self::Percent(p) => Some(*p),
            Self::Stretched => Some(100),
            _ => None,
        }
    }
}

impl From<i32> for Measure {
    fn from(v: i32) -> Self {
        Self::Fixed(v)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit => write!(f, "Inherit"),
            Self::Fit => write!(f, "Fit"),
            Self::Stretched => write!(f, "Stretched"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Fixed(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for Measure {
    type Err = Error;

    /// Parse the textual form. An empty string is a zero fixed size.
    fn from_str(s: &str) -> Result<Self> {
        let st = s.trim();
        match st {
            "" => Ok(Self::Fixed(0)),
            "Inherit" => Ok(Self::Inherit),
            "Fit" => Ok(Self::Fit),
            "Stretched" => Ok(Self::Stretched),
            _ => {
                let bad = || Error::Parse(format!("invalid measure {s:?}"));
                if let Some(p) = st.strip_suffix('%') {
                    p.parse::<i32>().map(Self::percent).map_err(|_| bad())
                } else {
                    st.parse::<i32>().map(Self::Fixed).map_err(|_| bad())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Measure::Fixed(3).is_fixed());
        assert!(!Measure::Fit.is_relative_to_parent());
        assert!(Measure::Stretched.is_relative_to_parent());
        assert!(Measure::Percent(0).is_relative_to_parent());
        assert_eq!(Measure::percent(100), Measure::Stretched);
        assert_eq!(Measure::Stretched.percentage(), Some(100));
        assert_eq!(Measure::Fixed(10).percentage(), None);
    }

    #[test]
    fn text() -> Result<()> {
        for (s, m) in [
            ("Inherit", Measure::Inherit),
            ("Fit", Measure::Fit),
            ("Stretched", Measure::Stretched),
            ("50%", Measure::Percent(50)),
            ("120", Measure::Fixed(120)),
            ("-4", Measure::Fixed(-4)),
        ] {
            assert_eq!(s.parse::<Measure>()?, m);
            assert_eq!(m.to_string(), s);
        }
        assert_eq!("100%".parse::<Measure>()?, Measure::Stretched);
        assert_eq!(" Fit ".parse::<Measure>()?, Measure::Fit);
        assert_eq!("".parse::<Measure>()?, Measure::Fixed(0));
        assert!("fit".parse::<Measure>().is_err());
        assert!("12px".parse::<Measure>().is_err());
        assert!("x%".parse::<Measure>().is_err());
        Ok(())
    }
}
