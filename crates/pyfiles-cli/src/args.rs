use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "pyfiles")]
#[command(about = "Generate the RPM %files list for an installed Python distribution")]
#[command(version)]
pub struct Cli {
    /// Path to save the generated list of paths
    #[arg(short, long)]
    pub output: PathBuf,

    /// Build root the distribution was installed into
    #[arg(long)]
    pub buildroot: PathBuf,

    /// Pure-Python site-packages directory (as installed, e.g. /usr/lib/python3.9/site-packages)
    #[arg(long)]
    pub sitelib: PathBuf,

    /// Arch-specific site-packages directory
    #[arg(long)]
    pub sitearch: PathBuf,

    /// Directory holding installed entry-point executables
    #[arg(long)]
    pub bindir: PathBuf,

    /// Interpreter version driving bytecode cache names
    #[arg(long, value_name = "MAJOR.MINOR")]
    pub python_version: String,

    /// Module globs to save; pass +bindir to also include executables
    #[arg(required = true, value_name = "GLOB")]
    pub varargs: Vec<String>,
}
