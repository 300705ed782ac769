//! Line-wise rewriting. Every function walks the content one line at a time and
//! keeps the original line terminators.

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRewrite {
    pub text: String,
    /// Lines replaced or, for deletions, lines dropped.
    pub changed_lines: usize,
}

fn split_terminator(line: &str) -> (&str, &str) {
    match line.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (line, ""),
    }
}

fn map_lines<F>(content: &str, mut rewrite: F) -> LineRewrite
where
    F: FnMut(&str) -> Option<String>,
{
    let mut text = String::with_capacity(content.len());
    let mut changed_lines = 0;
    for line in content.split_inclusive('\n') {
        let (body, terminator) = split_terminator(line);
        match rewrite(body) {
            Some(new_body) => {
                if new_body != body {
                    changed_lines += 1;
                }
                text.push_str(&new_body);
                text.push_str(terminator);
            }
            None => changed_lines += 1,
        }
    }
    LineRewrite {
        text,
        changed_lines,
    }
}

/// Replace every literal occurrence of `old` with `new`, line by line.
pub fn replace_literal(content: &str, old: &str, new: &str) -> LineRewrite {
    map_lines(content, |body| Some(body.replace(old, new)))
}

/// Apply `pattern` to each line; `replacement` may use `$1` / `${name}` references.
pub fn replace_pattern(content: &str, pattern: &Regex, replacement: &str) -> LineRewrite {
    map_lines(content, |body| {
        Some(pattern.replace_all(body, replacement).into_owned())
    })
}

/// Drop every line containing `term`.
pub fn delete_lines_containing(content: &str, term: &str) -> LineRewrite {
    map_lines(content, |body| {
        (!body.contains(term)).then(|| body.to_string())
    })
}
