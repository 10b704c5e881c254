use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrapper around an object to store an index along it.
///
/// This is used to store on which side of a valuation (`1` or `0`)
/// a formula is asserted in a tableau,
/// or in which standard a statement is asserted in metainferential tableaux.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Indexed<T, I>(pub T, pub I);

impl<T> From<T> for Indexed<T, Option<u8>> {
    fn from(x: T) -> Self {
        Self(x, None)
    }
}

/// Display unindexed objects as they are, and indexed objects as `x, i`.
impl<T: Display, I: Display> Display for Indexed<T, Option<I>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.1 {
            None => self.0.fmt(f),
            Some(i) => write!(f, "{}, {}", self.0, i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Formula;
    use alloc::string::ToString;

    #[test]
    fn display() {
        let p = Formula::atom("p");
        assert_eq!(Indexed::from(p.clone()).to_string(), "p");
        assert_eq!(Indexed(-p, Some(0u8)).to_string(), "~p, 0");
    }
}
