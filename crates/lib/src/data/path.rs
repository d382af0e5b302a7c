//! Path type for addressing values in the data store.
//!
//! A path is a string of components joined by `/`. A literal `/` inside a
//! component is written `\/` and a literal backslash `\\`, so a `/` only splits
//! when it is preceded by an even run of backslashes (including none).
//!
//! # Examples
//!
//! ```rust
//! use myopie::data::Path;
//!
//! let path = Path::parse("user/profile/name");
//! assert_eq!(path.components().collect::<Vec<_>>(), vec!["user", "profile", "name"]);
//!
//! // Escaped separators stay inside their component
//! let path = Path::parse(r"files/a\/b.txt");
//! assert_eq!(path.components().collect::<Vec<_>>(), vec!["files", "a/b.txt"]);
//!
//! // The empty path refers to the whole snapshot
//! assert!(Path::parse("").is_root());
//! ```

use std::{convert::Infallible, fmt, str::FromStr};

/// Separator between path components.
pub const SEPARATOR: char = '/';

/// Escape character for separators and itself.
pub const ESCAPE: char = '\\';

/// A parsed path: an ordered list of unescaped components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    components: Vec<String>,
}

impl Path {
    /// The path of the whole snapshot.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a path string. Parsing never fails: every string is a path.
    pub fn parse(input: &str) -> Self {
        if input.is_empty() {
            return Self::root();
        }

        let mut components = Vec::new();
        let mut current = String::new();
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE => match chars.peek().copied() {
                    Some(next @ (SEPARATOR | ESCAPE)) => {
                        chars.next();
                        current.push(next);
                    }
                    // A lone backslash is literal
                    _ => current.push(ESCAPE),
                },
                SEPARATOR => components.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        components.push(current);

        Self { components }
    }

    /// Appends a raw (unescaped) component.
    pub fn push(mut self, component: impl Into<String>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Iterates over the unescaped components.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.components.iter().map(String::as_str)
    }

    /// Splits into the parent components and the last component.
    ///
    /// Returns `None` for the root path.
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        let (last, parents) = self.components.split_last()?;
        Some((last.as_str(), parents))
    }

    /// Returns true if this path addresses the whole snapshot.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Writes the path back in its escaped string form.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            for c in component.chars() {
                if c == SEPARATOR || c == ESCAPE {
                    write!(f, "{ESCAPE}")?;
                }
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl From<&String> for Path {
    fn from(s: &String) -> Self {
        Path::parse(s)
    }
}
