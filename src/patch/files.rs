use regex::Regex;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use toaster_patch_core::{
    LineRewrite, NamedListError, delete_lines_containing, replace_literal, replace_pattern,
    rewrite_named_list,
};
use tracing::info;

use super::{PatchOutcome, SkipReason, read_content};
use crate::error::ToasterError;

fn skipped_missing(path: &Path) -> PatchOutcome {
    info!(path = %path.display(), "skipped: no such file");
    PatchOutcome::Skipped(SkipReason::FileNotFound)
}

/// `<path>.bak`, next to the edited file.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Remove every regular file matching the glob `pattern`. Returns how many were removed.
pub fn delete_file(pattern: &str) -> Result<usize, ToasterError> {
    info!(pattern, "deleting files");
    let mut removed = 0;
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(glob::GlobError::into_error)?;
        if path.is_file() {
            fs::remove_file(&path)?;
            info!(path = %path.display(), "deleted");
            removed += 1;
        } else {
            info!(path = %path.display(), "not a regular file; kept");
        }
    }
    if removed == 0 {
        info!(pattern, "no file matched");
    }
    Ok(removed)
}

/// Drop the lines of `path` containing `term`.
pub fn delete_line(term: &str, path: &Path) -> Result<PatchOutcome, ToasterError> {
    info!(path = %path.display(), term, "deleting lines containing term");
    let Some(content) = read_content(path)? else {
        return Ok(skipped_missing(path));
    };
    let LineRewrite {
        text,
        changed_lines,
    } = delete_lines_containing(&content, term);
    fs::write(path, text)?;
    info!(path = %path.display(), removed = changed_lines, "lines deleted");
    Ok(PatchOutcome::Applied {
        changes: changed_lines,
    })
}

/// Whether `path` contains `term`; `None` when the file does not exist.
pub fn file_contains(term: &str, path: &Path) -> Result<Option<bool>, ToasterError> {
    match read_content(path)? {
        Some(content) => Ok(Some(content.contains(term))),
        None => {
            info!(path = %path.display(), "skipped: no such file");
            Ok(None)
        }
    }
}

/// Append `text` to an existing file, on a line of its own.
pub fn append_to_file(text: &str, path: &Path) -> Result<PatchOutcome, ToasterError> {
    let Some(content) = read_content(path)? else {
        return Ok(skipped_missing(path));
    };
    let mut file = OpenOptions::new().append(true).open(path)?;
    if !content.is_empty() && !content.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    file.write_all(text.as_bytes())?;
    Ok(PatchOutcome::Applied { changes: 1 })
}

/// Append `term` unless the file already contains it.
pub fn add_line(term: &str, path: &Path) -> Result<PatchOutcome, ToasterError> {
    info!(path = %path.display(), term, "adding line");
    match file_contains(term, path)? {
        None => Ok(PatchOutcome::Skipped(SkipReason::FileNotFound)),
        Some(true) => {
            info!(path = %path.display(), "skipped: line already there");
            Ok(PatchOutcome::Skipped(SkipReason::AlreadyPresent))
        }
        Some(false) => append_to_file(term, path),
    }
}

fn rewrite_with_backup<F>(path: &Path, rewrite: F) -> Result<PatchOutcome, ToasterError>
where
    F: FnOnce(&str) -> LineRewrite,
{
    let Some(content) = read_content(path)? else {
        return Ok(skipped_missing(path));
    };
    fs::write(backup_path(path), &content)?;
    let LineRewrite {
        text,
        changed_lines,
    } = rewrite(&content);
    fs::write(path, text)?;
    info!(path = %path.display(), changed = changed_lines, "file rewritten");
    Ok(PatchOutcome::Applied {
        changes: changed_lines,
    })
}

/// Replace every occurrence of `old` with `new`, leaving `<path>.bak` behind.
pub fn replace_simple(old: &str, new: &str, path: &Path) -> Result<PatchOutcome, ToasterError> {
    info!(path = %path.display(), old, new, "simple replacing");
    rewrite_with_backup(path, |content| replace_literal(content, old, new))
}

/// Regex substitution applied line by line, leaving `<path>.bak` behind.
///
/// `replacement` follows the `regex` crate syntax: `$1`, `${1}`, `${name}`.
pub fn replace_regex(
    pattern: &str,
    replacement: &str,
    path: &Path,
) -> Result<PatchOutcome, ToasterError> {
    info!(path = %path.display(), pattern, replacement, "regex replacing");
    let re = Regex::new(pattern)?;
    rewrite_with_backup(path, |content| replace_pattern(content, &re, replacement))
}

/// Rewrite the list literal assigned to `variable` in a Python file.
///
/// Elements whose package name is denied are removed and allowed entries
/// appended; a file without a matching assignment is an error.
pub fn replace_list<D, A>(
    path: &Path,
    locator: &str,
    denylist: &[D],
    allowlist: &[A],
    variable: &str,
) -> Result<PatchOutcome, ToasterError>
where
    D: AsRef<str>,
    A: AsRef<str>,
{
    let Some(content) = read_content(path)? else {
        return Ok(skipped_missing(path));
    };
    let locator = Regex::new(locator)?;
    let rewrite = rewrite_named_list(&content, &locator, denylist, allowlist, variable).map_err(
        |error| match error {
            NamedListError::LocatorNotMatched { variable } => ToasterError::ListNotFound {
                variable,
                path: path.to_path_buf(),
            },
            NamedListError::Parse(source) => ToasterError::ListParse {
                variable: variable.to_string(),
                path: path.to_path_buf(),
                source,
            },
        },
    )?;

    for element in &rewrite.removed {
        info!(variable, element = %element, "removed");
    }
    for element in &rewrite.added {
        info!(variable, element = %element, "added");
    }
    for element in &rewrite.already_present {
        info!(variable, element = %element, "already present");
    }

    fs::write(path, &rewrite.text)?;
    Ok(PatchOutcome::Applied {
        changes: rewrite.removed.len() + rewrite.added.len(),
    })
}
