//! Key-chains: ordered tuples of segments naming one leaf in a config tree.

use std::fmt;

/// An ordered sequence of string segments identifying a path from the
/// config root to a leaf, e.g. `("database", "host")`.
///
/// Key-chains are the map keys of the flat representation produced by
/// [`flatten`](crate::flatten). Equality and hashing are structural over
/// the segment sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChain(Vec<String>);

impl KeyChain {
    /// Creates an empty key-chain (the config root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a key-chain from an iterator of segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parses dot notation (`"lvl1.lvl2.key"`) into a key-chain.
    pub fn from_dotted(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    /// Returns a new key-chain extended by one segment.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    /// Returns this key-chain with `prefix` prepended, used when splicing
    /// an included file's content under its including key.
    pub fn prefixed_by(&self, prefix: &KeyChain) -> Self {
        let mut segments = prefix.0.clone();
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}
