//! Per-row template expansion.

use tracing::trace;

use crate::error::TemplateError;
use crate::model::{ArgumentRow, SuiteFile, Test};
use crate::tempid::{self, TempIdSource};
use crate::template::{Bindings, Template, UnboundName};

/// A test with its template expanded once per data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedTest {
    pub name: String,
    pub cases: Vec<String>,
}

/// Binds the row's values to the argument names and draws ten fresh
/// temporary identifiers.
pub fn row_bindings(test: &Test, row: &ArgumentRow, ids: &mut dyn TempIdSource) -> Bindings {
    let mut bindings: Bindings = test
        .arg_names
        .iter()
        .cloned()
        .zip(row.values.iter().cloned())
        .collect();
    for name in tempid::reserved_names() {
        bindings.insert(name, ids.next_id());
    }
    bindings
}

pub fn expand_test(
    test: &Test,
    file: &str,
    ids: &mut dyn TempIdSource,
) -> Result<ExpandedTest, TemplateError> {
    let template = Template::parse(&test.code).map_err(|pos| {
        TemplateError::invalid_placeholder(&test.name, file, test.line, pos.line, pos.column)
    })?;

    let cases = test
        .rows
        .iter()
        .map(|row| {
            let bindings = row_bindings(test, row, ids);
            template.render(&bindings).map_err(|UnboundName(name)| {
                TemplateError::undefined_placeholder(&test.name, name, file, row.line)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!(test = %test.name, cases = cases.len(), "expanded test");
    Ok(ExpandedTest {
        name: test.name.clone(),
        cases,
    })
}

pub fn expand_suite(
    suite: &SuiteFile,
    ids: &mut dyn TempIdSource,
) -> Result<Vec<ExpandedTest>, TemplateError> {
    suite
        .tests
        .iter()
        .map(|test| expand_test(test, &suite.file, ids))
        .collect()
}
