use serde::Serialize;

use crate::model::{SuiteFile, Test};

/// JSON view of a parsed test-data file.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub file: &'a str,
    pub total_tests: usize,
    pub total_rows: usize,
    pub tests: &'a [Test],
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn build_output(suite: &SuiteFile) -> JsonOutput<'_> {
        JsonOutput {
            file: &suite.file,
            total_tests: suite.tests.len(),
            total_rows: suite.total_rows(),
            tests: &suite.tests,
        }
    }

    pub fn to_json(suite: &SuiteFile) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::build_output(suite))
    }
}
