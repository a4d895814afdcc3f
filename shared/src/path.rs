use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SharedError;

/// Bit marking a hardened child index.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Ordered list of child indices selecting a key in the hierarchical tree.
///
/// Paths are immutable once built. The textual form follows the usual
/// `m/44'/0'/0` notation where an apostrophe (or `h`) marks a hardened index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn new(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a child index with the hardened bit applied.
    pub const fn hardened(index: u32) -> u32 {
        index | HARDENED_BIT
    }

    pub const fn is_hardened(index: u32) -> bool {
        index & HARDENED_BIT != 0
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(value: &[u32]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for DerivationPath {
    fn from(value: [u32; N]) -> Self {
        Self(value.to_vec())
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            if Self::is_hardened(*index) {
                write!(f, "/{}'", index & !HARDENED_BIT)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut segments = trimmed.split('/');
        match segments.next() {
            Some("m") | Some("M") => {}
            _ => return Err(SharedError::invalid_path(trimmed, "missing 'm' root")),
        }

        let mut indices = Vec::new();
        for segment in segments {
            let (digits, hardened) = match segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
            {
                Some(digits) => (digits, true),
                None => (segment, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                SharedError::invalid_path(trimmed, format!("'{segment}' is not an index"))
            })?;
            if Self::is_hardened(index) {
                return Err(SharedError::invalid_path(
                    trimmed,
                    format!("index {index} exceeds the hardened range"),
                ));
            }
            indices.push(if hardened {
                Self::hardened(index)
            } else {
                index
            });
        }

        Ok(Self(indices))
    }
}
