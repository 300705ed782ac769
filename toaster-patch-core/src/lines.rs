/// Separator used when splitting file content into lines and joining it back.
pub const LINE_SEPARATOR: &str = "\n";

/// Split `content` on [`LINE_SEPARATOR`].
///
/// A trailing separator yields a trailing empty line, so `join_lines(split_lines(s)) == s`.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split(LINE_SEPARATOR).collect()
}

pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(LINE_SEPARATOR)
}

/// Index of the first line exactly equal to `target`.
pub fn index_of<S: AsRef<str>>(target: &str, lines: &[S]) -> Option<usize> {
    lines.iter().position(|line| line.as_ref() == target)
}
