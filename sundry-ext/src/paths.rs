//! Path resolution helpers.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base`, collapsing `.` and `..` lexically.
///
/// An absolute `path` is returned as-is (normalised). Symlinks are not
/// followed and nothing is touched on disk.
pub fn absolute_from(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.as_ref().join(path)
    };
    normalize(&joined)
}

/// The directory containing the last `marker` component of `path`.
///
/// Used to climb from a build output directory (e.g. `target/debug/deps`)
/// back to the project root. Paths without the marker are returned unchanged.
pub fn outside_build_dir(path: impl AsRef<Path>, marker: &str) -> PathBuf {
    let path = path.as_ref();
    let components: Vec<Component<'_>> = path.components().collect();
    match components
        .iter()
        .rposition(|c| matches!(c, Component::Normal(name) if *name == marker))
    {
        Some(index) => components[..index].iter().collect(),
        None => path.to_path_buf(),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_base() {
        assert_eq!(
            absolute_from("/srv/app", "data/../config/app.toml"),
            PathBuf::from("/srv/app/config/app.toml")
        );
        assert_eq!(absolute_from("/srv/app", "./x"), PathBuf::from("/srv/app/x"));
    }

    #[test]
    fn absolute_paths_ignore_base() {
        assert_eq!(absolute_from("/srv/app", "/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn parent_of_root_stays_at_root() {
        assert_eq!(absolute_from("/", "../../tmp"), PathBuf::from("/tmp"));
    }

    #[test]
    fn climbs_out_of_build_dir() {
        assert_eq!(
            outside_build_dir("/work/proj/target/debug/deps", "target"),
            PathBuf::from("/work/proj")
        );
        assert_eq!(
            outside_build_dir("/work/proj/src", "target"),
            PathBuf::from("/work/proj/src")
        );
    }

    #[test]
    fn uses_innermost_marker() {
        assert_eq!(
            outside_build_dir("/a/target/b/target/debug", "target"),
            PathBuf::from("/a/target/b")
        );
    }
}
