use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::path::Path;
use tdgen::cli::{self, OutputFormat};
use tdgen::discovery;
use tdgen::generate::{GenerateReport, Generator};
use tdgen::logging::{self, Verbosity};

const PROGRAM: &str = "tdgen";

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let verbosity = Verbosity::from_flags(args.verbose, args.quiet);
    logging::init(verbosity);

    args.validate().context("Invalid arguments")?;
    let mut generator = Generator::new(args.to_config()?);
    let announce = verbosity > Verbosity::Quiet;

    if args.all {
        return generate_all(&mut generator, args.format, announce);
    }

    let infile = args.infile.as_deref().context("--infile is required")?;
    let outfile = args.outfile.as_deref().context("--outfile is required")?;
    let report = generator
        .run(infile, outfile, &[], args.format)
        .with_context(|| format!("Cannot generate test code from '{}'", infile.display()))?;
    if announce {
        print_report(&generator, &report, infile, outfile);
    }
    Ok(())
}

fn generate_all(generator: &mut Generator, format: OutputFormat, announce: bool) -> Result<()> {
    let tests_dir = generator.config().tests_dir.clone();
    cli::validate_dir(&tests_dir).context("Invalid tests directory")?;

    let files = discovery::discover(&tests_dir, format.extension())?;
    if files.is_empty() {
        tracing::warn!(dir = %tests_dir.display(), "no test-data files found");
    }

    for file in &files {
        let extra: Vec<String> = file.header.iter().cloned().collect();
        let report = generator
            .run(&file.infile, &file.outfile, &extra, format)
            .with_context(|| {
                format!("Cannot generate test code from '{}'", file.infile.display())
            })?;
        if announce {
            print_report(generator, &report, &file.infile, &file.outfile);
        }
    }
    Ok(())
}

fn print_report(generator: &Generator, report: &GenerateReport, infile: &Path, outfile: &Path) {
    if let Some(ref dir) = report.created_dir {
        println!("Directory '{}' doesn't exist, creating new.", dir.display());
    }
    println!(
        "{PROGRAM}: [INFO] Test code generated from: '{}' written to: '{}' at '{}'",
        infile.display(),
        outfile.display(),
        generator.config().codegen_dir.display()
    );
}
