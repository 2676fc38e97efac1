use std::process::ExitCode;

use cardmint::ui::output;

fn main() -> ExitCode {
    match cardmint::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
