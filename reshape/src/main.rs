//! Reshape CLI - convert records between JSON and CSV
//!
//! ```bash
//! reshape --from json --to csv --infer-plan input.json     # Propose and apply a plan
//! reshape --from json --to csv --plan plan.json input.json # Apply a reviewed plan
//! reshape --from csv --to json --pretty < input.csv        # Read stdin, pretty output
//! reshape --from json --to csv --infer-plan --save-plan plan.json input.json
//! ```
//!
//! Rendered data goes to stdout (or `--output`). Lossy-operation warnings
//! and errors go to stderr; any failure exits with status 1.

use clap::error::ErrorKind;
use clap::Parser;
use reshape::logs::StderrLogger;
use reshape::{convert, save_plan, Config, ConvertOptions, Format, PlanSource};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "reshape", version)]
#[command(about = "Convert records between JSON and CSV through an explicit conversion plan", long_about = None)]
struct Cli {
    /// Input format (json or csv)
    #[arg(long, value_name = "FORMAT")]
    from: Format,

    /// Output format (json or csv)
    #[arg(long, value_name = "FORMAT")]
    to: Format,

    /// Conversion plan file to apply
    #[arg(long, value_name = "FILE", conflicts_with = "infer_plan")]
    plan: Option<PathBuf>,

    /// Infer a conversion plan for the target format
    #[arg(long)]
    infer_plan: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Save the effective plan to a file
    #[arg(long, value_name = "FILE")]
    save_plan: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file (default: stdin)
    input: Option<PathBuf>,
}

impl Cli {
    fn plan_source(&self) -> PlanSource {
        match (&self.plan, self.infer_plan) {
            (Some(path), _) => PlanSource::File(path.clone()),
            (None, true) => PlanSource::Infer,
            (None, false) => PlanSource::None,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let config = Config::from_env()
        .with_verbosity(cli.verbose)
        .with_pretty(cli.pretty);
    let _ = StderrLogger::init(config.log_level);

    if let Err(e) = run(&cli, config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(cli.input.as_deref())?;

    let options = ConvertOptions::new(cli.from, cli.to)
        .with_plan(cli.plan_source())
        .with_pretty(config.pretty);
    let result = convert(&input, &options)?;

    if let Some(path) = &cli.save_plan {
        save_plan(path, &result.plan)?;
    }

    for warning in &result.warnings {
        eprintln!("{}", warning);
    }

    write_output(&result.output, cli.output.as_deref())?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(bytes: &[u8], path: Option<&Path>) -> io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes)?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
