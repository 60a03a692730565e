//! Line-oriented parser for test-data (`.tdata`) files.
//!
//! ```text
//! => STRBUF_APPEND
//! # comment
//! <%
//! strbuf $tmp0 = cstr($s);
//! strbuf_append(&$tmp0, cstr($append_this));
//! result = strbuf_cmp(&$tmp0, cstr($expected)) == 0;
//! %>
//! :s         append_this     expected
//! "hello, "  "world"         "hello, world"
//! ```
//!
//! Each line is classified on its trimmed text by [`classify_line`], then fed
//! through [`transition`], an explicit state machine over [`State`]. Argument
//! names are positional: every data row must carry exactly one literal per
//! declared name.
//!
//! Code may share a line with either block marker (`<% int x = $a;`,
//! `result = x; %>`) and is kept. A `=>` line inside an open code block is
//! rejected as an unterminated block rather than silently starting the next
//! test.

use std::collections::HashSet;
use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind};
use crate::literal;
use crate::model::{ArgumentRow, SuiteFile, Test};
use crate::tempid;
use crate::utils::is_identifier;

pub const TEST_START_TAG: &str = "=>";
pub const COMMENT_START_TAG: &str = "#";
pub const BLOCK_START_TAG: &str = "<%";
pub const BLOCK_END_TAG: &str = "%>";
pub const ARGS_START_TAG: &str = ":";

/// Non-literal characters a data row may contain in strict mode, besides
/// whitespace.
pub const ROW_SEPARATORS: &[char] = &[',', ';', '(', ')', '[', ']', '{', '}'];

/// Syntactic role of a line, independent of parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `=> name`, carrying the trimmed name.
    TestStart(&'a str),
    /// Blank line or `#` comment.
    Ignorable,
    /// `<%`, carrying any code written after the marker.
    BlockStart(&'a str),
    /// `<% code %>` on a single line, carrying the inner code.
    InlineBlock(&'a str),
    /// A line ending in `%>`, carrying any code written before the marker.
    BlockEnd(&'a str),
    /// `: a b c`, carrying everything after the marker.
    Header(&'a str),
    Text,
}

pub fn classify_line(trimmed: &str) -> LineKind<'_> {
    if let Some(name) = trimmed.strip_prefix(TEST_START_TAG) {
        return LineKind::TestStart(name.trim());
    }
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_START_TAG) {
        return LineKind::Ignorable;
    }
    if let Some(rest) = trimmed.strip_prefix(BLOCK_START_TAG) {
        return match rest.strip_suffix(BLOCK_END_TAG) {
            Some(inner) => LineKind::InlineBlock(inner),
            None => LineKind::BlockStart(rest.trim()),
        };
    }
    if let Some(code) = trimmed.strip_suffix(BLOCK_END_TAG) {
        return LineKind::BlockEnd(code.trim());
    }
    if let Some(names) = trimmed.strip_prefix(ARGS_START_TAG) {
        return LineKind::Header(names);
    }
    LineKind::Text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Before the first test.
    Idle,
    /// Inside a test, no argument header yet.
    InTest,
    InCodeBlock { header_seen: bool, opened_at: usize },
    /// Argument header read; data rows may follow.
    AfterHeader,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Skip,
    StartTest(&'a str),
    /// Append the raw, untrimmed line to the active test's code.
    AppendLine,
    AppendCode(&'a str),
    SetHeader(&'a str),
    AddRow,
}

/// The parser's transition table.
pub fn transition<'a>(
    state: State,
    kind: LineKind<'a>,
    line_no: usize,
) -> Result<(State, Action<'a>), ParseErrorKind> {
    use LineKind as L;
    use State as S;

    match (state, kind) {
        (S::InCodeBlock { opened_at, .. }, L::TestStart(_)) => {
            Err(ParseErrorKind::UnterminatedBlock { opened_at })
        }
        (_, L::TestStart(name)) => Ok((S::InTest, Action::StartTest(name))),

        (state, L::Ignorable) => Ok((state, Action::Skip)),

        (S::Idle, _) => Err(ParseErrorKind::OutsideTest),

        (S::InCodeBlock { .. }, L::BlockStart(_) | L::InlineBlock(_)) => {
            Err(ParseErrorKind::NestedBlock)
        }
        (S::InCodeBlock { header_seen, .. }, L::BlockEnd(code)) => {
            let next = if header_seen { S::AfterHeader } else { S::InTest };
            Ok((next, code_action(code)))
        }
        (state @ S::InCodeBlock { .. }, L::Header(_) | L::Text) => Ok((state, Action::AppendLine)),

        (S::InTest, L::BlockStart(code)) => Ok((
            S::InCodeBlock {
                header_seen: false,
                opened_at: line_no,
            },
            code_action(code),
        )),
        (S::AfterHeader, L::BlockStart(code)) => Ok((
            S::InCodeBlock {
                header_seen: true,
                opened_at: line_no,
            },
            code_action(code),
        )),
        (state, L::InlineBlock(code)) => Ok((state, code_action(code))),
        (_, L::BlockEnd(_)) => Err(ParseErrorKind::UnexpectedBlockEnd),

        (S::InTest, L::Header(names)) => Ok((S::AfterHeader, Action::SetHeader(names))),
        (S::AfterHeader, L::Header(_)) => Err(ParseErrorKind::DuplicateHeader),

        (S::InTest, L::Text) => Err(ParseErrorKind::RowBeforeHeader),
        (S::AfterHeader, L::Text) => Ok((S::AfterHeader, Action::AddRow)),
    }
}

/// Code sharing a line with a block marker; nothing to append when blank.
fn code_action(code: &str) -> Action<'_> {
    if code.trim().is_empty() {
        Action::Skip
    } else {
        Action::AppendCode(code)
    }
}

pub struct Parser<'a> {
    file: &'a str,
    strict: bool,
    state: State,
    suite: SuiteFile,
    /// Most recent argument header line of the active test.
    header: Option<&'a str>,
    block_start: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(file: &'a str) -> Self {
        Self {
            file,
            strict: true,
            state: State::Idle,
            suite: SuiteFile::new(file),
            header: None,
            block_start: "",
        }
    }

    /// In strict mode, data rows may only contain literals, whitespace and
    /// [`ROW_SEPARATORS`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feeds one line (without its terminator). `line_no` is 1-based.
    pub fn feed(&mut self, line_no: usize, line: &'a str) -> Result<(), ParseError> {
        let trimmed = line.trim();
        let kind = classify_line(trimmed);
        let (next, action) = transition(self.state, kind, line_no)
            .map_err(|kind| self.error(line_no, trimmed, kind))?;

        if matches!(next, State::InCodeBlock { .. })
            && !matches!(self.state, State::InCodeBlock { .. })
        {
            self.block_start = trimmed;
        }

        match action {
            Action::Skip => {}
            Action::StartTest(name) => self.start_test(line_no, trimmed, name)?,
            Action::AppendLine => self.append_code(line_no, trimmed, line)?,
            Action::AppendCode(code) => self.append_code(line_no, trimmed, code)?,
            Action::SetHeader(names) => self.set_header(line_no, trimmed, names)?,
            Action::AddRow => self.add_row(line_no, trimmed)?,
        }

        self.state = next;
        Ok(())
    }

    pub fn finish(self) -> Result<SuiteFile, ParseError> {
        if let State::InCodeBlock { opened_at, .. } = self.state {
            return Err(self.error(
                opened_at,
                self.block_start,
                ParseErrorKind::UnterminatedBlock { opened_at },
            ));
        }
        debug!(
            file = self.file,
            tests = self.suite.tests.len(),
            rows = self.suite.total_rows(),
            "parsed test-data file"
        );
        Ok(self.suite)
    }

    fn error(&self, line_no: usize, text: &str, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.file, line_no, text, self.header, kind)
    }

    fn active_test(&mut self, line_no: usize, text: &str) -> Result<&mut Test, ParseError> {
        let index = self
            .suite
            .tests
            .len()
            .checked_sub(1)
            .ok_or_else(|| self.error(line_no, text, ParseErrorKind::OutsideTest))?;
        Ok(&mut self.suite.tests[index])
    }

    fn start_test(&mut self, line_no: usize, trimmed: &str, name: &str) -> Result<(), ParseError> {
        self.header = None;
        if name.is_empty() {
            return Err(self.error(line_no, trimmed, ParseErrorKind::EmptyTestName));
        }
        trace!(name, line = line_no, "test started");
        self.suite
            .tests
            .push(Test::new(name, line_no));
        Ok(())
    }

    fn append_code(&mut self, line_no: usize, trimmed: &str, code: &str) -> Result<(), ParseError> {
        let test = self.active_test(line_no, trimmed)?;
        test.code.push_str(code);
        test.code.push('\n');
        Ok(())
    }

    fn set_header(&mut self, line_no: usize, trimmed: &'a str, names: &str) -> Result<(), ParseError> {
        self.header = Some(trimmed);

        let mut seen = HashSet::new();
        let mut arg_names = Vec::new();
        for name in names.split_whitespace() {
            let kind = if !is_identifier(name) {
                Some(ParseErrorKind::InvalidArgumentName {
                    name: name.to_string(),
                })
            } else if tempid::is_reserved_name(name) {
                Some(ParseErrorKind::ReservedArgument {
                    name: name.to_string(),
                })
            } else if !seen.insert(name) {
                Some(ParseErrorKind::DuplicateArgument {
                    name: name.to_string(),
                })
            } else {
                None
            };
            if let Some(kind) = kind {
                return Err(self.error(line_no, trimmed, kind));
            }
            arg_names.push(name.to_string());
        }

        trace!(line = line_no, args = ?arg_names, "argument header");
        self.active_test(line_no, trimmed)?.arg_names = arg_names;
        Ok(())
    }

    fn add_row(&mut self, line_no: usize, trimmed: &str) -> Result<(), ParseError> {
        let mut scanner = literal::scan(trimmed);
        let mut values = Vec::new();
        let mut gaps = Vec::new();
        let mut prev_end = 0;
        for token in scanner.by_ref() {
            gaps.push(&trimmed[prev_end..token.start]);
            values.push(token.text.to_string());
            prev_end = token.end;
        }
        gaps.push(scanner.remainder());

        if self.strict {
            let stray = gaps
                .iter()
                .find(|gap| gap.chars().any(|c| !c.is_whitespace() && !ROW_SEPARATORS.contains(&c)));
            if let Some(stray) = stray {
                let kind = ParseErrorKind::StrayText {
                    text: stray.trim().to_string(),
                };
                return Err(self.error(line_no, trimmed, kind));
            }
        }

        let expected = self.active_test(line_no, trimmed)?.arity();
        if values.len() != expected {
            let kind = ParseErrorKind::ArityMismatch {
                expected,
                found: values.len(),
            };
            return Err(self.error(line_no, trimmed, kind));
        }

        self.active_test(line_no, trimmed)?.rows.push(ArgumentRow {
            values,
            line: line_no,
        });
        Ok(())
    }
}

/// Parses a whole test-data file.
pub fn parse_suite(source: &str, file: &str, strict: bool) -> Result<SuiteFile, ParseError> {
    let mut parser = Parser::new(file).strict(strict);
    for (index, line) in source.lines().enumerate() {
        parser.feed(index + 1, line)?;
    }
    parser.finish()
}
