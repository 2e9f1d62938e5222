use std::process::ExitCode;

use graphql_paths::{cli, logging};

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init_tracing(command_line_interface.verbosity());
    match command_line_interface.run() {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => cli::report_failure(&error),
    }
}
