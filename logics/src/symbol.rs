use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt::{self, Display};

/// Name of an atomic, constant, metavariable, context variable or rule.
///
/// Symbols are cheap to clone and compare by their contents.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the symbol into its longest non-numeric prefix and numeric suffix.
    ///
    /// ~~~
    /// # use logics::Symbol;
    /// assert_eq!(Symbol::from("p12").split_digits(), ("p", "12"));
    /// assert_eq!(Symbol::from("E∧").split_digits(), ("E∧", ""));
    /// ~~~
    pub fn split_digits(&self) -> (&str, &str) {
        let s = self.as_str();
        let prefix = s.trim_end_matches(|c: char| c.is_ascii_digit());
        s.split_at(prefix.len())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl core::ops::Deref for Symbol {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
