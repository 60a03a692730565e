use thiserror::Error;

/// What went wrong on a test-data line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("argument values list inconsistent: expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("unexpected text in data row: '{text}'")]
    StrayText { text: String },

    #[error("data row before the argument header")]
    RowBeforeHeader,

    #[error("content outside of any test")]
    OutsideTest,

    #[error("code block opened at line {opened_at} is never closed")]
    UnterminatedBlock { opened_at: usize },

    #[error("code block end without a matching start")]
    UnexpectedBlockEnd,

    #[error("code block start inside another code block")]
    NestedBlock,

    #[error("argument header declared twice for the same test")]
    DuplicateHeader,

    #[error("argument '{name}' declared more than once")]
    DuplicateArgument { name: String },

    #[error("argument '{name}' shadows a reserved temporary identifier")]
    ReservedArgument { name: String },

    #[error("argument name '{name}' is not a valid identifier")]
    InvalidArgumentName { name: String },

    #[error("test name is empty")]
    EmptyTestName,
}

/// Structural error in a test-data file, located by file and 1-based line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{kind}\nFile: '{file}': line {line}:\n{text}\nWhile arg-names line is:\n{}",
    .header.as_deref().unwrap_or("<none>")
)]
pub struct ParseError {
    pub file: String,
    pub line: usize,
    pub text: String,
    pub header: Option<String>,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        text: impl Into<String>,
        header: Option<&str>,
        kind: ParseErrorKind,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            text: text.into(),
            header: header.map(str::to_string),
            kind,
        }
    }
}
