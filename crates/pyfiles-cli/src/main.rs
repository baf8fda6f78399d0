use std::fs;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use pyfiles_core::layout::{InstallLayout, PythonVersion};
use pyfiles_core::{
    classify_paths, generate_file_list, locate_record, parse_record, parse_varargs, read_record,
    Result,
};

mod args;
use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let python_version: PythonVersion = cli.python_version.parse()?;
    let layout = InstallLayout {
        buildroot: cli.buildroot,
        sitelib: cli.sitelib,
        sitearch: cli.sitearch,
        bindir: cli.bindir,
        python_version,
    };

    // Validate the varargs before any filesystem work.
    let save_args = parse_varargs(&cli.varargs)?;

    let record_path = locate_record(&layout)?;
    let rows = read_record(&layout.real_path(&record_path))?;
    let parsed = parse_record(&record_path, &rows);

    let classified = classify_paths(&record_path, &parsed, &layout);
    for warning in &classified.warnings {
        eprintln!("{} {}", "[WARN]".yellow().bold(), warning);
    }

    let lines = generate_file_list(&classified, &save_args)?;

    // Written only once the whole list exists; failures leave no partial file.
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&cli.output, content)?;

    println!(
        "{} {} ({} entries)",
        "Saved:".green(),
        cli.output.display(),
        lines.len()
    );

    Ok(())
}
