//! Parse, expand and emit: from test-data text to a generated module.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::config::GeneratorConfig;
use crate::emit::Emitter;
use crate::error::{IoError, Result};
use crate::expand::expand_suite;
use crate::model::SuiteFile;
use crate::output::OutputFormatter;
use crate::parser::parse_suite;
use crate::tempid::TempIdSource;

/// What one generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output directory that had to be created first.
    pub created_dir: Option<PathBuf>,
    pub tests: usize,
    pub cases: usize,
}

/// Turns test-data files into C modules. One generator draws all of its
/// temporary identifiers from a single source, so identifiers stay unique
/// across every file it generates.
pub struct Generator {
    config: GeneratorConfig,
    emitter: Emitter,
    ids: Box<dyn TempIdSource>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let ids = config.temp_id_source();
        Self::with_ids(config, ids)
    }

    pub fn with_ids(config: GeneratorConfig, ids: Box<dyn TempIdSource>) -> Self {
        Self {
            emitter: Emitter::new(config.progress_width),
            config,
            ids,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn parse(&self, source: &str, module_name: &str) -> Result<SuiteFile> {
        Ok(parse_suite(source, module_name, self.config.strict_rows)?)
    }

    /// The C module for `source`. Config includes come first, then `extra`.
    pub fn generate(
        &mut self,
        source: &str,
        module_name: &str,
        extra: &[String],
    ) -> Result<String> {
        self.render(source, module_name, extra, OutputFormat::C)
    }

    pub fn render(
        &mut self,
        source: &str,
        module_name: &str,
        extra: &[String],
        format: OutputFormat,
    ) -> Result<String> {
        let suite = self.parse(source, module_name)?;
        self.render_suite(&suite, extra, format)
    }

    fn render_suite(
        &mut self,
        suite: &SuiteFile,
        extra: &[String],
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::C => {
                let tests = expand_suite(suite, self.ids.as_mut())?;
                let includes: Vec<String> = self
                    .config
                    .includes
                    .iter()
                    .chain(extra)
                    .cloned()
                    .collect();
                Ok(self.emitter.emit_module(&suite.file, &includes, &tests))
            }
            OutputFormat::Json => Ok(OutputFormatter::to_json(suite)?),
        }
    }

    /// Generates `codegen_dir/outfile` from `tests_dir/infile`. Nothing is
    /// written unless the whole module was produced.
    pub fn run(
        &mut self,
        infile: &Path,
        outfile: &Path,
        extra: &[String],
        format: OutputFormat,
    ) -> Result<GenerateReport> {
        let input = self.config.tests_dir.join(infile);
        let output = self.config.codegen_dir.join(outfile);
        debug!(input = %input.display(), output = %output.display(), "generating");

        let source = fs::read_to_string(&input).map_err(|e| IoError::read_error(&input, e))?;
        let suite = self.parse(&source, &infile.display().to_string())?;
        let text = self.render_suite(&suite, extra, format)?;

        let created_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                ensure_dir(dir)?.then(|| dir.to_path_buf())
            }
            _ => None,
        };
        write_atomic(&output, &text)?;

        let tests = suite.tests.len();
        let cases = suite.total_rows();
        info!(output = %output.display(), tests, cases, "wrote module");

        Ok(GenerateReport {
            input,
            output,
            created_dir,
            tests,
            cases,
        })
    }
}

/// Creates `dir` and its parents. Returns whether it had to be created.
pub fn ensure_dir(dir: &Path) -> std::result::Result<bool, IoError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| IoError::create_dir_error(dir, e))?;
    Ok(true)
}

/// Writes through a temporary file in the destination directory, renamed
/// over `path` once complete.
pub fn write_atomic(path: &Path, contents: &str) -> std::result::Result<(), IoError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| IoError::write_error(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| IoError::write_error(path, e))?;
    file.persist(path)
        .map_err(|e| IoError::write_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TempIdStrategy;
    use crate::error::{Error, ParseErrorKind};
    use crate::tempid::SequentialIds;
    use tempfile::TempDir;

    const REVERSE: &str = "=> reverse_digits\n<%\nresult = (reverse($n) == $r);\n%>\n:n r\n123 321\n";

    fn config_in(temp_dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig {
            tests_dir: temp_dir.path().join("tests"),
            codegen_dir: temp_dir.path().join("build/tests"),
            ..Default::default()
        }
    }

    fn sequential(config: GeneratorConfig) -> Generator {
        Generator::with_ids(config, Box::new(SequentialIds::with_salt("t")))
    }

    #[test]
    fn test_generate_orders_config_includes_first() {
        let config = GeneratorConfig {
            includes: vec!["a.h".to_string()],
            ..Default::default()
        };
        let out = sequential(config)
            .generate(REVERSE, "r.tdata", &["b.h".to_string()])
            .unwrap();
        assert!(out.find("#include \"a.h\"").unwrap() < out.find("#include \"b.h\"").unwrap());
        assert!(out.contains("result = (reverse(123) == 321);"));
    }

    #[test]
    fn test_temp_ids_unique_across_files() {
        let source = "=> t\n<%\nint $tmp0 = $v;\n%>\n:v\n1\n";
        let mut generator = sequential(GeneratorConfig::default());
        let first = generator.generate(source, "a.tdata", &[]).unwrap();
        let second = generator.generate(source, "b.tdata", &[]).unwrap();
        assert!(first.contains("int tmp_t_0 = 1;"));
        assert!(second.contains("int tmp_t_10 = 1;"));
    }

    #[test]
    fn test_render_json() {
        let out = sequential(GeneratorConfig::default())
            .render(REVERSE, "r.tdata", &[], OutputFormat::Json)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["tests"][0]["name"], "reverse_digits");
        assert_eq!(json["total_rows"], 1);
    }

    #[test]
    fn test_permissive_config_accepts_stray_text() {
        let source = "=> t\n<%\nresult = $a;\n%>\n:a\n1 junk\n";
        assert!(sequential(GeneratorConfig::default())
            .generate(source, "s.tdata", &[])
            .is_err());

        let config = GeneratorConfig {
            strict_rows: false,
            ..Default::default()
        };
        let out = sequential(config).generate(source, "s.tdata", &[]).unwrap();
        assert!(out.contains("result = 1;"));
    }

    #[test]
    fn test_run_creates_codegen_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        fs::create_dir_all(&config.tests_dir).unwrap();
        fs::write(config.tests_dir.join("r.tdata"), REVERSE).unwrap();

        let report = sequential(config.clone())
            .run(Path::new("r.tdata"), Path::new("r.c"), &[], OutputFormat::C)
            .unwrap();

        assert_eq!(report.created_dir, Some(config.codegen_dir.clone()));
        assert_eq!(report.output, config.codegen_dir.join("r.c"));
        assert_eq!(report.tests, 1);
        assert_eq!(report.cases, 1);
        assert!(fs::read_to_string(&report.output)
            .unwrap()
            .contains("reverse(123)"));
    }

    #[test]
    fn test_run_existing_codegen_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        fs::create_dir_all(&config.tests_dir).unwrap();
        fs::create_dir_all(&config.codegen_dir).unwrap();
        fs::write(config.tests_dir.join("r.tdata"), REVERSE).unwrap();

        let report = sequential(config)
            .run(Path::new("r.tdata"), Path::new("r.c"), &[], OutputFormat::C)
            .unwrap();
        assert_eq!(report.created_dir, None);
    }

    #[test]
    fn test_run_parse_error_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        fs::create_dir_all(&config.tests_dir).unwrap();
        fs::write(config.tests_dir.join("bad.tdata"), "=> t\n:a b\n1\n").unwrap();

        let err = sequential(config.clone())
            .run(Path::new("bad.tdata"), Path::new("bad.c"), &[], OutputFormat::C)
            .unwrap_err();

        match err {
            Error::Parse(e) => {
                assert_eq!(e.line, 3);
                assert_eq!(
                    e.kind,
                    ParseErrorKind::ArityMismatch {
                        expected: 2,
                        found: 1
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!config.codegen_dir.exists());
    }

    #[test]
    fn test_run_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let err = sequential(config_in(&temp_dir))
            .run(Path::new("none.tdata"), Path::new("none.c"), &[], OutputFormat::C)
            .unwrap_err();
        assert!(matches!(err, Error::Io(IoError::ReadError { .. })));
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.c");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_new_uses_configured_strategy() {
        let config = GeneratorConfig {
            temp_ids: TempIdStrategy::Sequential,
            salt: Some("cfg".to_string()),
            ..Default::default()
        };
        let out = Generator::new(config)
            .generate("=> t\n<%\nint $tmp0;\n%>\n:\n()\n", "c.tdata", &[])
            .unwrap();
        assert!(out.contains("int tmp_cfg_0;"));
    }
}
