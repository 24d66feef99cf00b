//! Source-control links for the `caller` field
//!
//! A call site `project/src/handlers.rs` at line 42 becomes
//! `https://github.com/org/repo/blob/<ref>/src/handlers.rs#L42` when a link
//! template is configured, and `src/handlers.rs:42` otherwise.

/// Reference used when no version is configured
pub const DEFAULT_REF: &str = "HEAD";

/// Maps a call site to a browsable source link.
///
/// The first path segment is treated as the local root marker and dropped;
/// everything after it is assumed to mirror the repository layout. Deeper or
/// absolute prefixes are not detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLinkResolver {
    template: String,
    reference: String,
}

impl SourceLinkResolver {
    /// `template` is the repository base URL; `reference` the commit or
    /// version to link against (empty selects [`DEFAULT_REF`]).
    pub fn new(template: impl Into<String>, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self {
            template: template.into(),
            reference: if reference.is_empty() {
                DEFAULT_REF.to_string()
            } else {
                reference
            },
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Full `caller` value for `file_path` at `line`
    pub fn resolve(&self, file_path: &str, line: u32) -> String {
        match self.link(file_path) {
            Some(link) => format!("{}#L{}", link, line),
            None => short_form(file_path, line),
        }
    }

    /// Link to the file without a line anchor, or `None` when no template is
    /// configured or the path is empty.
    pub fn link(&self, file_path: &str) -> Option<String> {
        if self.template.is_empty() || file_path.is_empty() {
            return None;
        }

        let remaining = file_path.split_once('/').map_or("", |(_, rest)| rest);
        let remaining = strip_line_suffix(remaining);

        Some(format!(
            "{}/blob/{}/{}",
            self.template, self.reference, remaining
        ))
    }
}

/// `a/b/c/file.rs:12` -> `c/file.rs:12`
fn short_form(file_path: &str, line: u32) -> String {
    let path = strip_line_suffix(file_path);
    if path.is_empty() {
        return format!("unknown:{}", line);
    }

    let mut segments = path.rsplitn(3, '/');
    let file = segments.next().unwrap_or_default();
    match segments.next() {
        Some(dir) if !dir.is_empty() => format!("{}/{}:{}", dir, file, line),
        _ => format!("{}:{}", file, line),
    }
}

/// Drop a trailing `:<digits>` suffix
fn strip_line_suffix(path: &str) -> &str {
    match path.rsplit_once(':') {
        Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => path,
    }
}
