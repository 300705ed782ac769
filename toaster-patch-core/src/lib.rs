//! I/O-free text transformations shared by the patch primitives and pipelines.

pub mod error;
pub mod lines;
pub mod list_literal;
pub mod named_list;
pub mod rewrite;
pub mod status;

pub use error::{ListParseError, ListParseErrorKind, NamedListError};
pub use lines::{LINE_SEPARATOR, index_of, join_lines, split_lines};
pub use list_literal::{parse_string_list, requirement_name, serialize_string_list};
pub use named_list::{ListRewrite, rewrite_named_list};
pub use rewrite::{LineRewrite, delete_lines_containing, replace_literal, replace_pattern};
pub use status::{parse_short_status, status_matches};
