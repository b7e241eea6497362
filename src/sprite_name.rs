use std::{
    fmt,
    path::{self, Path},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

/// The name of a sprite: the path of its source image relative to the folder
/// of the config that found it, always separated with `/`.
///
/// Names are what the manifest is keyed by, so they have to come out the same
/// on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteName(Arc<str>);

impl SpriteName {
    /// Returns `None` if `image_path` is not inside `root_path`.
    pub fn from_paths(root_path: &Path, image_path: &Path) -> Option<Self> {
        let relative = image_path.strip_prefix(root_path).ok()?;
        let displayed = relative.display().to_string();

        let displayed = if path::MAIN_SEPARATOR == '/' {
            displayed
        } else {
            displayed.replace(path::MAIN_SEPARATOR, "/")
        };

        Some(SpriteName(displayed.into()))
    }
}

impl AsRef<str> for SpriteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_to_root() {
        let root = Path::new("project");
        let image = root.join("icons").join("close.png");

        let name = SpriteName::from_paths(root, &image).unwrap();
        assert_eq!(name.as_ref(), "icons/close.png");
    }

    #[test]
    fn outside_root() {
        let name = SpriteName::from_paths(Path::new("project"), Path::new("elsewhere/a.png"));
        assert_eq!(name, None);
    }
}
