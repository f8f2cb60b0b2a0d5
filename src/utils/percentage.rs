use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.);

    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value.is_nan() || value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }

    /// Share of `part` in `whole`. An empty whole is 0%, never a division by zero.
    pub fn of(part: i64, whole: i64) -> Percentage {
        if whole <= 0 {
            return Percentage::ZERO;
        }
        Percentage((part.max(0) as f64 / whole as f64 * 100.).min(100.))
    }

    /// Whole-number percentage, rounded half away from zero.
    pub fn rounded(&self) -> u32 {
        self.0.round() as u32
    }
}

impl FromStr for Percentage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // This means that 100%% also works, but I think I'm fine with that
        let s = s.trim_end_matches("%");
        let v = s.parse::<f64>()?;
        Percentage::new_opt(v).ok_or_else(|| anyhow!("Can't parse {s} into percentage"))
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Percentage;

    #[test]
    fn empty_whole_is_zero() {
        assert_eq!(Percentage::of(0, 0).rounded(), 0);
        assert_eq!(Percentage::of(10, 0).rounded(), 0);
    }

    #[test]
    fn share_is_rounded_and_bounded() {
        assert_eq!(Percentage::of(1, 3).rounded(), 33);
        assert_eq!(Percentage::of(2, 3).rounded(), 67);
        assert_eq!(Percentage::of(1, 2).rounded(), 50);
        assert_eq!(Percentage::of(5, 5).rounded(), 100);
        assert_eq!(Percentage::of(7, 5).rounded(), 100);
    }

    #[test]
    fn parses_with_and_without_sign() {
        assert_eq!("5%".parse::<Percentage>().ok(), Percentage::new_opt(5.));
        assert_eq!("2.5".parse::<Percentage>().ok(), Percentage::new_opt(2.5));
        assert!("-1".parse::<Percentage>().is_err());
        assert!("abc".parse::<Percentage>().is_err());
    }
}
