use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("undefined placeholder '${name}' in test '{test}' (file '{file}', data row at line {line})")]
    UndefinedPlaceholder {
        test: String,
        name: String,
        file: String,
        line: usize,
    },

    #[error(
        "invalid placeholder in test '{test}' (file '{file}', test at line {line}): \
         template line {template_line}, column {column}"
    )]
    InvalidPlaceholder {
        test: String,
        file: String,
        line: usize,
        template_line: usize,
        column: usize,
    },
}

impl TemplateError {
    pub fn undefined_placeholder(
        test: impl Into<String>,
        name: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::UndefinedPlaceholder {
            test: test.into(),
            name: name.into(),
            file: file.into(),
            line,
        }
    }

    pub fn invalid_placeholder(
        test: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        template_line: usize,
        column: usize,
    ) -> Self {
        Self::InvalidPlaceholder {
            test: test.into(),
            file: file.into(),
            line,
            template_line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_placeholder_display() {
        let err = TemplateError::undefined_placeholder("STRBUF_APPEND", "missing", "str.tdata", 9);
        assert_eq!(
            err.to_string(),
            "undefined placeholder '$missing' in test 'STRBUF_APPEND' (file 'str.tdata', data row at line 9)"
        );
    }

    #[test]
    fn test_invalid_placeholder_display() {
        let err = TemplateError::invalid_placeholder("T", "a.tdata", 3, 2, 7);
        assert_eq!(
            err.to_string(),
            "invalid placeholder in test 'T' (file 'a.tdata', test at line 3): template line 2, column 7"
        );
    }
}
