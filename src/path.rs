use crate::error::{FsError, Result};

/// Splits an absolute path into its non-empty `/`-separated segments.
///
/// Rejects paths that are empty or do not start with `/`. The root path
/// `"/"` parses to an empty segment list.
pub fn parse(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() || !path.starts_with('/') {
        return Err(FsError::InvalidPath(path.to_string()));
    }

    Ok(path.split('/').filter(|segment| !segment.is_empty()).collect())
}
