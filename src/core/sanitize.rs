//! Album title to directory name conversion

/// Turn an album title into a single directory segment
///
/// Path separators (`/` and `\`) become `-`, spaces become `_`; every other
/// character is kept. Distinct titles may map to the same segment, and
/// collisions are left to the caller.
pub fn sanitize(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ' ' => '_',
            other => other,
        })
        .collect()
}

/// Whether a sanitized segment can name a directory of its own
///
/// Empty, `.` and `..` would resolve to an existing directory instead.
pub fn is_usable_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}
