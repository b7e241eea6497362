//! A compiled glob pattern that can be read straight out of a config file.
//!
//! Patterns are matched against paths relative to the config folder. `*` stops
//! at path separators; use `**` to descend into folders.

use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use globset::{GlobBuilder, GlobMatcher};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

pub use globset::Error;

// Characters that can start glob syntax. Escapes like `[*]` are treated as
// patterns too, which only means we search a little more than needed.
const PATTERN_CHARACTERS: &[char] = &['*', '?', '{', '}', '[', ']'];

#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        Ok(Glob {
            pattern: pattern.to_owned(),
            matcher,
        })
    }

    pub fn is_match<P: AsRef<Path>>(&self, path: P) -> bool {
        self.matcher.is_match(path)
    }

    /// The longest leading run of path components that contains no pattern
    /// syntax. Only files under this folder can match, so it's where a search
    /// for matches should start.
    pub fn base_dir(&self) -> PathBuf {
        Path::new(&self.pattern)
            .components()
            .take_while(|component| match component {
                Component::Normal(part) => part
                    .to_str()
                    .map_or(false, |part| !part.contains(PATTERN_CHARACTERS)),
                _ => true,
            })
            .collect()
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl Serialize for Glob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

impl<'de> Deserialize<'de> for Glob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;

        Glob::new(&pattern).map_err(D::Error::custom)
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
