use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use taxogen::config::{Settings, DEFAULT_SETTINGS_FILE};
use taxogen::diagnostics::StdErrSink;

/// Generate a templated taxonomy from a delimited table.
#[derive(Debug, Parser)]
#[command(name = "taxogen", version, about)]
struct Cli {
    /// Path to the settings file.
    #[arg(default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let sink = StdErrSink;

    let settings = match Settings::load(&cli.settings, &sink) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!(
                "taxogen: cannot load settings file '{}': {err}",
                cli.settings.display()
            );
            return ExitCode::FAILURE;
        }
    };

    match taxogen::generate(&settings, &sink) {
        Ok(stats) => {
            eprintln!(
                "taxogen: wrote {} nodes from {} rows to '{}'",
                stats.nodes,
                stats.rows,
                settings.output_file().display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("taxogen: {err}");
            ExitCode::FAILURE
        }
    }
}
