/// Trim every line of `git status -s` output, dropping blank lines.
pub fn parse_short_status(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exact, order-sensitive comparison of observed status lines with the expected ones.
pub fn status_matches<A: AsRef<str>, B: AsRef<str>>(observed: &[A], expected: &[B]) -> bool {
    observed.len() == expected.len()
        && observed
            .iter()
            .zip(expected)
            .all(|(seen, wanted)| seen.as_ref() == wanted.as_ref())
}
