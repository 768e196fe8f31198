//! Hierarchical Raabe codes.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dewey-decimal-like label of a branch.
///
/// The root is `"0"`. A daughter's code is its parent's code followed by its
/// sibling number; siblings are numbered from 0 in order of decreasing
/// diameter, so the largest daughter of the root is `"00"` and the next one
/// `"01"`.
///
/// # Example
///
/// ```
/// use raabe_table::RaabeCode;
///
/// let root = RaabeCode::root();
/// let major = root.daughter(0);
/// let minor = root.daughter(1);
///
/// assert_eq!(major.as_str(), "00");
/// assert_eq!(minor.as_str(), "01");
/// assert!(root.is_ancestor_of(&minor));
/// assert!(!major.is_ancestor_of(&minor));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaabeCode(String);

impl RaabeCode {
    /// Code of the root segment.
    pub const ROOT: &'static str = "0";

    /// The root code.
    #[must_use]
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Code of this branch's daughter with the given sibling number.
    #[must_use]
    pub fn daughter(&self, sibling: usize) -> Self {
        Self(format!("{}{sibling}", self.0))
    }

    /// Re-root this code under `anchor`.
    ///
    /// The leading root character is dropped and the rest appended to
    /// `anchor`, so a tree's root maps onto `anchor` itself and its
    /// descendants extend it.
    ///
    /// # Example
    ///
    /// ```
    /// use raabe_table::RaabeCode;
    ///
    /// let anchor = RaabeCode::from("0010");
    /// assert_eq!(RaabeCode::root().rebase(&anchor).as_str(), "0010");
    /// assert_eq!(RaabeCode::from("001").rebase(&anchor).as_str(), "001001");
    /// ```
    #[must_use]
    pub fn rebase(&self, anchor: &Self) -> Self {
        let mut chars = self.0.chars();
        chars.next();
        Self(format!("{}{}", anchor.0, chars.as_str()))
    }

    /// Whether `other` lies in the subtree rooted at this code (inclusive).
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// The code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaabeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RaabeCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for RaabeCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for RaabeCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
