use anyhow::Result;

use crate::findings::Severity;
use crate::report;

pub mod args;
mod exit_status;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use run::CheckSummary;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Check(cmd)) => {
            let summary = run::check(&cmd)?;
            report::print_parse_warning(summary.parse_failures, verbose);
            if summary.findings.is_empty() {
                report::print_success(summary.files_checked);
                return Ok(ExitStatus::Success);
            }
            report::report(&summary.findings);
            let has_errors = summary
                .findings
                .iter()
                .any(|finding| finding.severity == Severity::Error);
            Ok(if has_errors {
                ExitStatus::Failure
            } else {
                ExitStatus::Success
            })
        }
        Some(Command::Init) => {
            run::init()?;
            println!("Created {}", crate::config::CONFIG_FILE_NAME);
            Ok(ExitStatus::Success)
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
