use serde::Serialize;

/// One data row: raw literal texts bound positionally to the test's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentRow {
    pub values: Vec<String>,
    /// 1-based line in the test-data file.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Test {
    /// Test name as written after the `=>` marker.
    pub name: String,
    /// Code template with `$name` placeholders, one line per source line.
    pub code: String,
    pub arg_names: Vec<String>,
    pub rows: Vec<ArgumentRow>,
    /// 1-based line of the test-start marker.
    pub line: usize,
}

impl Test {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            code: String::new(),
            arg_names: Vec::new(),
            rows: Vec::new(),
            line,
        }
    }

    pub fn arity(&self) -> usize {
        self.arg_names.len()
    }
}

/// All tests of one test-data file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteFile {
    pub file: String,
    pub tests: Vec<Test>,
}

impl SuiteFile {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            tests: Vec::new(),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.tests.iter().map(|t| t.rows.len()).sum()
    }
}
