use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListParseErrorKind {
    ExpectedOpenBracket,
    ExpectedString,
    ExpectedCommaOrClose,
    UnterminatedString,
    UnterminatedList,
    TrailingInput,
}

impl std::fmt::Display for ListParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ExpectedOpenBracket => "expected '['",
            Self::ExpectedString => "expected a quoted string",
            Self::ExpectedCommaOrClose => "expected ',' or ']'",
            Self::UnterminatedString => "unterminated string",
            Self::UnterminatedList => "unterminated list",
            Self::TrailingInput => "unexpected input after ']'",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("invalid list literal at byte {offset}: {kind}")]
pub struct ListParseError {
    pub offset: usize,
    pub kind: ListParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum NamedListError {
    #[error("no assignment of `{variable}` matched the locator pattern")]
    LocatorNotMatched { variable: String },

    #[error(transparent)]
    Parse(#[from] ListParseError),
}
