use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use mfsim_cli::document::{load_container, render_container, render_schema, save_container};
use mfsim_cli::report::{CheckReport, check_container, summarize};

use crate::cli::{CheckArgs, FormatArgs, InspectArgs, SchemaArgs};
use crate::summary::{print_check_report, print_inventory};

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let container = load_container(&args.file)?;
    let summary = summarize(&container);
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        println!("{json}");
    } else {
        print_inventory(&summary);
    }
    Ok(())
}

/// Loads and checks a document; the caller decides the exit code.
pub fn run_check(args: &CheckArgs) -> Result<CheckReport> {
    let span = info_span!("check", file = %args.file.display());
    let _guard = span.enter();
    let container = load_container(&args.file)?;
    let report = check_container(&container);
    info!(
        cells = report.checked_cells,
        violations = report.violations.len(),
        "Check finished"
    );
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize check report")?;
        println!("{json}");
    } else {
        print_check_report(&report);
    }
    Ok(report)
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let container = load_container(&args.file)?;
    let xml = render_schema(&container, &args.item, args.schema_name.as_deref())?;
    write_stdout(&xml)
}

pub fn run_format(args: &FormatArgs) -> Result<()> {
    let container = load_container(&args.file)?;
    match &args.output {
        Some(path) => save_container(&container, path),
        None => write_stdout(&render_container(&container)?),
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes()).context("write stdout")?;
    stdout.flush().context("flush stdout")
}
