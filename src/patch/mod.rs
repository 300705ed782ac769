//! File-patch primitives applied to local checkouts.
//!
//! Every primitive takes an explicit path. A missing target file is never an
//! error: the primitive logs the skip and returns [`PatchOutcome::Skipped`].

mod content;
mod download;
mod files;

pub use content::{
    file_path, list_directory_names, list_local_repository_names, read_content, read_yaml,
};
pub use download::download_file;
pub use files::{
    add_line, append_to_file, backup_path, delete_file, delete_line, file_contains, replace_list,
    replace_regex, replace_simple,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FileNotFound,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// `changes` counts affected lines (or list elements for list rewrites).
    Applied { changes: usize },
    Skipped(SkipReason),
}

impl PatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PatchOutcome::Applied { .. })
    }
}
