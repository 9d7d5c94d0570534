use super::error::WikiError;

/// Zero-byte object that keeps an otherwise empty directory listable.
pub const DIRECTORY_MARKER: &str = ".keep";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    File,
    Directory,
}

/// Guess what a path names from its spelling alone: a trailing `/`, or a
/// last segment without a `.`, means a directory.
///
/// The store is never consulted, so an extensionless page such as
/// `users/alice/README` is classified as a directory. Callers that know
/// better pass an explicit `is_directory`.
pub fn resolve_type(path: &str) -> PathType {
    if path.ends_with('/') || !file_name(path).contains('.') {
        PathType::Directory
    } else {
        PathType::File
    }
}

/// Append the trailing `/` a directory prefix needs. The empty prefix stays
/// empty.
pub fn normalize_dir(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Reject paths that could not have come from a well-formed key.
pub fn validate_path(path: &str) -> Result<(), WikiError> {
    if path.is_empty() {
        return Err(WikiError::validation("path is required"));
    }
    if path.starts_with('/') {
        return Err(WikiError::validation(format!(
            "path must not start with '/': {}",
            path
        )));
    }

    let body = path.strip_suffix('/').unwrap_or(path);
    for segment in body.split('/') {
        match segment {
            "" => {
                return Err(WikiError::validation(format!(
                    "path contains an empty segment: {}",
                    path
                )))
            }
            "." | ".." => {
                return Err(WikiError::validation(format!(
                    "path contains a relative segment: {}",
                    path
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

/// [`validate_path`], plus the rules for something that will be written as a
/// single object. Only a trailing `/` disqualifies a path here; extensionless
/// names are accepted when the caller addresses them as files.
pub fn validate_file_path(path: &str) -> Result<(), WikiError> {
    validate_path(path)?;
    if path.ends_with('/') {
        return Err(WikiError::validation(format!(
            "expected a file path, got a directory: {}",
            path
        )));
    }
    if file_name(path) == DIRECTORY_MARKER {
        return Err(WikiError::validation(format!(
            "'{}' is reserved: {}",
            DIRECTORY_MARKER, path
        )));
    }
    Ok(())
}

/// Last segment of a key.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

pub fn marker_key(dir: &str) -> String {
    format!("{}{}", normalize_dir(dir), DIRECTORY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_type() {
        assert_eq!(resolve_type("users/alice/notes/"), PathType::Directory);
        assert_eq!(resolve_type("users/alice/notes"), PathType::Directory);
        assert_eq!(resolve_type("users/alice/notes.md"), PathType::File);
        assert_eq!(resolve_type("users/alice/v1.2/"), PathType::Directory);
        // known limitation: extensionless pages read as directories
        assert_eq!(resolve_type("users/alice/README"), PathType::Directory);
    }

    #[test]
    fn test_normalize_dir() {
        assert_eq!(normalize_dir("users/alice/notes"), "users/alice/notes/");
        assert_eq!(normalize_dir("users/alice/notes/"), "users/alice/notes/");
        assert_eq!(normalize_dir(""), "");
    }

    #[test]
    fn test_validate_path() {
        for ok in [
            "users/alice/a.md",
            "users/alice/",
            "users/alice/deep/er/page.md",
            "users/alice/.hidden",
        ] {
            assert!(validate_path(ok).is_ok(), "{} should be valid", ok);
        }

        for bad in [
            "",
            "/users/alice/a.md",
            "users//alice/a.md",
            "users/alice//",
            "users/alice/./a.md",
            "users/alice/../bob/a.md",
            "users/alice/..",
        ] {
            assert!(
                matches!(validate_path(bad), Err(WikiError::Validation(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("users/alice/a.md").is_ok());
        assert!(validate_file_path("users/alice/README").is_ok());
        assert!(validate_file_path("users/alice/dir/").is_err());
        assert!(validate_file_path("users/alice/dir/.keep").is_err());
    }

    #[test]
    fn test_file_name_and_marker() {
        assert_eq!(file_name("users/alice/notes/todo.md"), "todo.md");
        assert_eq!(file_name("todo.md"), "todo.md");
        assert_eq!(marker_key("users/alice/notes"), "users/alice/notes/.keep");
        assert_eq!(marker_key("users/alice/notes/"), "users/alice/notes/.keep");
    }
}
