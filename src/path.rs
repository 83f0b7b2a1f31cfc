use crate::checkers::is_normalized_windows_drive_letter;
use std::fmt;

/// The path of a URL.
///
/// Opaque paths belong to non-special schemes without an authority and are
/// a single atomic string; non-opaque paths are a segment list serialized
/// with a `/` before each segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPath {
    Opaque(String),
    NonOpaque(Vec<String>),
}

impl UrlPath {
    pub(crate) fn empty() -> UrlPath {
        UrlPath::NonOpaque(Vec::new())
    }

    /// Drop the last segment, except that the lone drive letter of a `file`
    /// URL stays put. Defined on non-opaque paths only.
    pub(crate) fn shorten(&mut self, scheme: &str) {
        let UrlPath::NonOpaque(segments) = self else {
            debug_assert!(false, "cannot shorten an opaque path");
            return;
        };

        if scheme == "file"
            && segments.len() == 1
            && is_normalized_windows_drive_letter(&segments[0])
        {
            return;
        }
        segments.pop();
    }

    /// Add a segment (non-opaque) or extend the single segment (opaque).
    pub(crate) fn append(&mut self, segment: &str) {
        match self {
            UrlPath::Opaque(path) => path.push_str(segment),
            UrlPath::NonOpaque(segments) => segments.push(segment.to_owned()),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, UrlPath::Opaque(_))
    }

    /// The segment list of a non-opaque path.
    pub fn segments(&self) -> Option<&[String]> {
        match self {
            UrlPath::Opaque(_) => None,
            UrlPath::NonOpaque(segments) => Some(segments),
        }
    }
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPath::Opaque(path) => f.write_str(path),
            UrlPath::NonOpaque(segments) => {
                for segment in segments {
                    f.write_str("/")?;
                    f.write_str(segment)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_segments_with_leading_slashes() {
        let path = UrlPath::NonOpaque(vec!["a".into(), "b".into(), "".into()]);
        assert_eq!(path.to_string(), "/a/b/");
        assert_eq!(UrlPath::empty().to_string(), "");
        assert_eq!(UrlPath::Opaque("mailto-target".into()).to_string(), "mailto-target");
    }

    #[test]
    fn shorten_drops_last_segment() {
        let mut path = UrlPath::NonOpaque(vec!["a".into(), "b".into()]);
        path.shorten("http");
        assert_eq!(path.segments(), Some(&["a".to_owned()][..]));

        let mut path = UrlPath::empty();
        path.shorten("http");
        assert_eq!(path, UrlPath::empty());
    }

    #[test]
    fn shorten_keeps_lone_file_drive_letter() {
        let mut path = UrlPath::NonOpaque(vec!["c:".into()]);
        path.shorten("file");
        assert_eq!(path.segments(), Some(&["c:".to_owned()][..]));

        let mut path = UrlPath::NonOpaque(vec!["c:".into()]);
        path.shorten("http");
        assert_eq!(path, UrlPath::empty());

        let mut path = UrlPath::NonOpaque(vec!["c:".into(), "x".into()]);
        path.shorten("file");
        assert_eq!(path.segments(), Some(&["c:".to_owned()][..]));
    }
}
