//! C scaffolding around expanded test cases.
//!
//! The generated `main` owns all counters: `grand_total`, `total_ok` and
//! `total_fail` for the module, `mod_total`, `mod_ok` and `mod_fail` for the
//! current test, `result` for the current case and `exit_status`, which turns
//! 1 on the first failing case.

use crate::expand::ExpandedTest;
use crate::utils::escape_c_string;

pub const DEFAULT_PROGRESS_WIDTH: usize = 20;

const MODULE_PRELUDE: &str = "#include <stdio.h>\n#include <stdlib.h>\n";

const MAIN_COUNTERS: &str = r#"int main() {
	size_t grand_total = 0;
	size_t total_ok = 0;
	size_t total_fail = 0;
	size_t mod_total = 0;
	size_t mod_ok = 0;
	size_t mod_fail = 0;
	int result = 0;
	int exit_status = 0;
"#;

const CASE_OUTCOME: &str = r#"
	if (result) {
		mod_ok++;
		total_ok++;
		putchar('.');
	} else {
		mod_fail++;
		total_fail++;
		exit_status = 1;
		putchar('x');
	}
"#;

#[derive(Debug, Clone)]
pub struct Emitter {
    progress_width: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_WIDTH)
    }
}

impl Emitter {
    /// `progress_width` is the number of progress marks per output line.
    pub fn new(progress_width: usize) -> Self {
        Self {
            progress_width: progress_width.max(1),
        }
    }

    /// One case: counts it, runs the snippet with `result` cleared, records
    /// the outcome and prints a progress mark.
    pub fn emit_case(&self, out: &mut String, snippet: &str) {
        out.push_str("\n\tgrand_total++;\n\tmod_total++;\n\tresult = 0;\n\n");
        out.push_str(snippet);
        if !snippet.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(CASE_OUTCOME);
        out.push_str(&format!(
            "\tif (mod_total % {} == 0)\n\t\tputchar('\\n');\n",
            self.progress_width
        ));
    }

    /// All cases of one test between start and end banners, followed by the
    /// test's own summary. The test name is escaped here.
    pub fn emit_test(&self, out: &mut String, test: &ExpandedTest) {
        let name = escape_c_string(&test.name);
        out.push_str("\n\tmod_total = 0;\n\tmod_ok = 0;\n\tmod_fail = 0;\n\n");
        out.push_str(&format!(
            "\tprintf(\"-----Starting: '%s' TEST-----\\n\", \"{name}\");\n"
        ));
        for case in &test.cases {
            self.emit_case(out, case);
        }
        out.push_str("\n\tprintf(\"\\n\");\n");
        out.push_str(&format!(
            "\tprintf(\"----------End: '%s' TEST-----\\n\", \"{name}\");\n"
        ));
        out.push_str(&summary("Test summary\\n", None, "mod_ok, mod_fail, mod_total"));
    }

    /// The complete source file. `module_name` is escaped here; `includes`
    /// are emitted verbatim as `#include "<name>"`, in order.
    pub fn emit_module(
        &self,
        module_name: &str,
        includes: &[String],
        tests: &[ExpandedTest],
    ) -> String {
        let name = escape_c_string(module_name);
        let mut out = String::new();

        out.push_str("/* Generated by tdgen. Do not edit. */\n");
        out.push_str(MODULE_PRELUDE);
        out.push('\n');
        for include in includes {
            out.push_str(&format!("#include \"{include}\"\n"));
        }
        out.push('\n');

        out.push_str(MAIN_COUNTERS);
        out.push_str(&format!(
            "\n\tprintf(\"*****START '%s' TEST MODULE*****\\n\\n\", \"{name}\");\n"
        ));
        for test in tests {
            self.emit_test(&mut out, test);
        }
        out.push_str("\n\tprintf(\"\\n\\n\");\n");
        out.push_str(&format!(
            "\tprintf(\"*******END '%s' TEST MODULE*****\\n\", \"{name}\");\n"
        ));
        out.push_str(&summary(
            "'%s' MODULE FINAL SUMMARY\\n",
            Some(&name),
            "total_ok, total_fail, grand_total",
        ));
        out.push_str("\n\treturn exit_status;\n}\n");
        out
    }
}

fn summary(title: &str, name: Option<&str>, counters: &str) -> String {
    let name_arg = name.map(|n| format!("\"{n}\", ")).unwrap_or_default();
    format!(
        "\tprintf(\n\
         \t\t\"{title}\"\n\
         \t\t\"Successes: %6zu\\n\"\n\
         \t\t\"Failures : %6zu\\n\"\n\
         \t\t\"Total    : %6zu\\n\",\n\
         \t\t{name_arg}{counters}\n\
         \t);\n"
    )
}
