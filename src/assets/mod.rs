//! Asset lookup: where animations and sounds live, and which files are there.

pub mod frames;
pub mod sound;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

pub const ANIMATIONS_DIR: &str = "animations";
pub const SOUNDS_DIR: &str = "sounds";

pub const ANIMATION_EXTENSIONS: &[&str] = &["gif"];
pub const SOUND_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

/// Resolve `relative` against `base`. Absolute paths are returned as-is.
pub fn resource_path(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        base.join(relative)
    }
}

/// Regular files in `dir` whose extension (case-insensitive) is one of
/// `extensions`, sorted by file name. A missing directory lists as empty.
pub fn list_files(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, nothing to list", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path);
        }
    }
    files.sort_by_key(|p| sort_key(p));
    Ok(files)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// File stem for display, e.g. `walk` for `animations/walk.gif`.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The assets root and the two folders the program reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirs {
    root: PathBuf,
}

impl AssetDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetDirs { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn animations_dir(&self) -> PathBuf {
        resource_path(&self.root, ANIMATIONS_DIR)
    }

    pub fn sounds_dir(&self) -> PathBuf {
        resource_path(&self.root, SOUNDS_DIR)
    }

    pub fn animations(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.animations_dir(), ANIMATION_EXTENSIONS)
    }

    pub fn sounds(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.sounds_dir(), SOUND_EXTENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn relative_paths_join_the_base() {
        let base = Path::new("/srv/stage");
        assert_eq!(
            resource_path(base, "sounds/type.mp3"),
            PathBuf::from("/srv/stage/sounds/type.mp3")
        );
        assert_eq!(resource_path(base, "/tmp/x.gif"), PathBuf::from("/tmp/x.gif"));
    }

    #[test]
    fn listing_filters_by_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["walk.gif", "Idle.GIF", "notes.txt", "blink.gif"] {
            touch(&dir.path().join(name));
        }
        fs::create_dir(dir.path().join("nested.gif")).unwrap();

        let names: Vec<String> = list_files(dir.path(), ANIMATION_EXTENSIONS)
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();

        assert_eq!(names, ["blink", "Idle", "walk"]);
    }

    #[test]
    fn missing_directory_lists_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_files(&dir.path().join("nope"), SOUND_EXTENSIONS).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn asset_dirs_find_sounds_and_animations() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDirs::new(dir.path());
        fs::create_dir(assets.animations_dir()).unwrap();
        fs::create_dir(assets.sounds_dir()).unwrap();
        touch(&assets.animations_dir().join("wave.gif"));
        touch(&assets.sounds_dir().join("type.mp3"));
        touch(&assets.sounds_dir().join("click.wav"));
        touch(&assets.sounds_dir().join("readme.md"));

        assert_eq!(assets.animations().unwrap().len(), 1);
        let sounds: Vec<String> = assets.sounds().unwrap().iter().map(|p| display_name(p)).collect();
        assert_eq!(sounds, ["click", "type"]);
    }
}
