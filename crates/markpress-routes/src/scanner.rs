//! Route discovery by globbing the root directory.
//!
//! The scan is repeated on every call. Nothing is cached between calls, so
//! a changed directory is picked up the next time routes are mapped.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::{INDEX_NAME, MARKDOWN_EXTENSION, RouteEntry, RouteError};

/// Result of scanning a root directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Absolute path of `index.md` directly inside the root directory.
    pub root_index: Option<PathBuf>,
    /// One entry per markdown file, in glob order.
    pub routes: Vec<RouteEntry>,
}

/// Scan `root_dir` for markdown files and derive a route for each.
///
/// `root_path` is prepended to every route. A trailing `/` is ignored and a
/// missing leading `/` is added, so `None`, `Some("")` and `Some("/")` all
/// mount the routes at the server root.
///
/// An empty or missing directory yields an empty [`Discovery`].
///
/// # Errors
///
/// Returns [`RouteError::Pattern`] if the directory name cannot be turned into
/// a glob pattern, or [`RouteError::Scan`] if an entry cannot be read.
pub fn map_routes(root_dir: &Path, root_path: Option<&str>) -> Result<Discovery, RouteError> {
    let prefix = normalize_prefix(root_path);
    let mut discovery = Discovery::default();

    for file in scan_markdown_files(root_dir)? {
        let Ok(rel_path) = file.strip_prefix(root_dir) else {
            tracing::warn!(path = %file.display(), "Skipping file outside root directory");
            continue;
        };
        let segments = path_segments(rel_path);
        if is_hidden(&segments) {
            continue;
        }
        let Some(entry) = route_entry(&segments, &prefix) else {
            continue;
        };

        if entry.render_path == INDEX_NAME {
            discovery.root_index = Some(absolute(&file)?);
        }

        tracing::debug!(
            get_path = %entry.get_path,
            render_path = %entry.render_path,
            "Mapped markdown file"
        );
        discovery.routes.push(entry);
    }

    Ok(discovery)
}

/// Locate the root `index.md` of `root_dir` without keeping the routes.
///
/// # Errors
///
/// Same as [`map_routes`].
pub fn find_root_index(root_dir: &Path) -> Result<Option<PathBuf>, RouteError> {
    map_routes(root_dir, None).map(|discovery| discovery.root_index)
}

/// Glob every `*.md` file below `root_dir`.
fn scan_markdown_files(root_dir: &Path) -> Result<Vec<PathBuf>, RouteError> {
    let base = Pattern::escape(&root_dir.to_string_lossy());
    let pattern = Path::new(&base)
        .join("**")
        .join(format!("*.{MARKDOWN_EXTENSION}"))
        .to_string_lossy()
        .into_owned();

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(&pattern, options)
        .map_err(|source| RouteError::Pattern { pattern, source })?;

    let mut files = Vec::new();
    for path in paths {
        let path = path.map_err(|e| RouteError::Scan {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Split a root-relative path into its normal segments, dropping `.md`
/// from the last one.
fn path_segments(rel_path: &Path) -> Vec<String> {
    let mut segments: Vec<String> = rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.last_mut()
        && let Some(stem) = last.strip_suffix(&format!(".{MARKDOWN_EXTENSION}"))
    {
        *last = stem.to_owned();
    }
    segments
}

/// Whether any segment is a dotfile or dot-directory.
fn is_hidden(segments: &[String]) -> bool {
    segments.iter().any(|s| s.starts_with('.'))
}

/// Derive the route entry for a file's path segments.
///
/// Examples (with empty prefix):
/// - `["index"]` -> `/`, `index`
/// - `["about"]` -> `/about`, `about`
/// - `["blog", "index"]` -> `/blog`, `blog/index`
/// - `["blog", "post1"]` -> `/blog/post1`, `blog/post1`
fn route_entry(segments: &[String], prefix: &str) -> Option<RouteEntry> {
    let (name, dirs) = segments.split_last()?;

    let entry = match (dirs.is_empty(), name == INDEX_NAME) {
        (true, true) => RouteEntry {
            get_path: if prefix.is_empty() {
                "/".to_owned()
            } else {
                prefix.to_owned()
            },
            render_path: INDEX_NAME.to_owned(),
        },
        (true, false) => RouteEntry {
            get_path: format!("{prefix}/{name}"),
            render_path: name.clone(),
        },
        (false, true) => {
            let dir = dirs.join("/");
            RouteEntry {
                get_path: format!("{prefix}/{dir}"),
                render_path: format!("{dir}/{INDEX_NAME}"),
            }
        }
        (false, false) => {
            let dir = dirs.join("/");
            RouteEntry {
                get_path: format!("{prefix}/{dir}/{name}"),
                render_path: format!("{dir}/{name}"),
            }
        }
    };
    Some(entry)
}

/// Normalize a route prefix to either `""` or `/segment[/segment..]`.
fn normalize_prefix(root_path: Option<&str>) -> String {
    let trimmed = root_path.unwrap_or_default().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Resolve a path against the current working directory.
fn absolute(path: &Path) -> Result<PathBuf, RouteError> {
    std::path::absolute(path).map_err(|source| RouteError::Scan {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(get_path: &str, render_path: &str) -> RouteEntry {
        RouteEntry {
            get_path: get_path.to_owned(),
            render_path: render_path.to_owned(),
        }
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_owned()).collect()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_route_entry_rules() {
        assert_eq!(route_entry(&segments(&["index"]), ""), Some(entry("/", "index")));
        assert_eq!(
            route_entry(&segments(&["about"]), ""),
            Some(entry("/about", "about"))
        );
        assert_eq!(
            route_entry(&segments(&["blog", "index"]), ""),
            Some(entry("/blog", "blog/index"))
        );
        assert_eq!(
            route_entry(&segments(&["blog", "post1"]), ""),
            Some(entry("/blog/post1", "blog/post1"))
        );
        assert_eq!(
            route_entry(&segments(&["a", "b", "c"]), ""),
            Some(entry("/a/b/c", "a/b/c"))
        );
        assert_eq!(route_entry(&[], ""), None);
    }

    #[test]
    fn test_route_entry_rules_with_prefix() {
        assert_eq!(
            route_entry(&segments(&["index"]), "/docs"),
            Some(entry("/docs", "index"))
        );
        assert_eq!(
            route_entry(&segments(&["about"]), "/docs"),
            Some(entry("/docs/about", "about"))
        );
        assert_eq!(
            route_entry(&segments(&["blog", "index"]), "/docs"),
            Some(entry("/docs/blog", "blog/index"))
        );
        assert_eq!(
            route_entry(&segments(&["blog", "post1"]), "/docs"),
            Some(entry("/docs/blog/post1", "blog/post1"))
        );
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(None), "");
        assert_eq!(normalize_prefix(Some("")), "");
        assert_eq!(normalize_prefix(Some("/")), "");
        assert_eq!(normalize_prefix(Some("/docs")), "/docs");
        assert_eq!(normalize_prefix(Some("/docs/")), "/docs");
        assert_eq!(normalize_prefix(Some("docs")), "/docs");
        assert_eq!(normalize_prefix(Some("/a/b")), "/a/b");
    }

    #[test]
    fn test_path_segments_strips_only_markdown_extension() {
        assert_eq!(path_segments(Path::new("index.md")), segments(&["index"]));
        assert_eq!(
            path_segments(Path::new("blog/post1.md")),
            segments(&["blog", "post1"])
        );
        assert_eq!(
            path_segments(Path::new("notes/v1.2.md")),
            segments(&["notes", "v1.2"])
        );
    }

    #[test]
    fn test_map_routes_nested_structure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "index.md", "# Home");
        write(root, "about.md", "# About");
        write(root, "blog/index.md", "# Blog");
        write(root, "blog/post1.md", "# Post");

        let discovery = map_routes(root, None).unwrap();

        let mut routes = discovery.routes.clone();
        routes.sort_by(|a, b| a.get_path.cmp(&b.get_path));
        assert_eq!(
            routes,
            vec![
                entry("/", "index"),
                entry("/about", "about"),
                entry("/blog", "blog/index"),
                entry("/blog/post1", "blog/post1"),
            ]
        );
        let root_index = discovery.root_index.unwrap();
        assert!(root_index.is_absolute());
        assert!(root_index.ends_with("index.md"));
        assert_eq!(root_index.parent().unwrap(), root);
    }

    #[test]
    fn test_map_routes_with_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "index.md", "# Home");
        write(root, "blog/post1.md", "# Post");

        let discovery = map_routes(root, Some("/site")).unwrap();

        assert!(discovery.routes.contains(&entry("/site", "index")));
        assert!(discovery.routes.contains(&entry("/site/blog/post1", "blog/post1")));
        assert_eq!(discovery.routes.len(), 2);
    }

    #[test]
    fn test_map_routes_nested_index_is_not_root_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "guide/index.md", "# Guide");

        let discovery = map_routes(root, None).unwrap();

        assert_eq!(discovery.routes, vec![entry("/guide", "guide/index")]);
        assert!(discovery.root_index.is_none());
    }

    #[test]
    fn test_map_routes_ignores_other_files_and_hidden_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "page.md", "# Page");
        write(root, "notes.txt", "plain");
        write(root, "README.MD", "# Upper");
        write(root, ".draft.md", "# Draft");
        write(root, ".git/info.md", "# Hidden dir");
        fs::create_dir_all(root.join("folder.md")).unwrap();

        let discovery = map_routes(root, None).unwrap();

        assert_eq!(discovery.routes, vec![entry("/page", "page")]);
    }

    #[test]
    fn test_map_routes_empty_dir() {
        let temp_dir = tempfile::tempdir().unwrap();

        let discovery = map_routes(temp_dir.path(), None).unwrap();

        assert_eq!(discovery, Discovery::default());
    }

    #[test]
    fn test_map_routes_missing_dir() {
        let discovery = map_routes(Path::new("/nonexistent/markpress"), None).unwrap();

        assert!(discovery.routes.is_empty());
        assert!(discovery.root_index.is_none());
    }

    #[test]
    fn test_map_routes_is_repeatable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "index.md", "# Home");
        write(root, "a/b.md", "# B");
        write(root, "c.md", "# C");

        let first = map_routes(root, Some("/p")).unwrap();
        let second = map_routes(root, Some("/p")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_map_routes_picks_up_new_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "a.md", "# A");
        assert_eq!(map_routes(root, None).unwrap().routes.len(), 1);

        write(root, "b.md", "# B");
        assert_eq!(map_routes(root, None).unwrap().routes.len(), 2);
    }

    #[test]
    fn test_map_routes_root_dir_with_glob_characters() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("docs [v1]");
        write(&root, "page.md", "# Page");

        let discovery = map_routes(&root, None).unwrap();

        assert_eq!(discovery.routes, vec![entry("/page", "page")]);
    }

    #[test]
    fn test_find_root_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "about.md", "# About");
        assert!(find_root_index(root).unwrap().is_none());

        write(root, "index.md", "# Home");
        assert!(find_root_index(root).unwrap().unwrap().ends_with("index.md"));
    }

    #[test]
    fn test_source_path_inverts_mapping() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "index.md", "# Home");
        write(root, "blog/post1.md", "# Post");

        let discovery = map_routes(root, None).unwrap();

        for route in &discovery.routes {
            assert!(crate::source_path(root, &route.render_path).is_file());
        }
        assert_eq!(
            crate::source_path(Path::new("docs"), "blog/post1"),
            Path::new("docs/blog/post1.md")
        );
    }
}
