use std::process::ExitCode;

fn main() -> ExitCode {
    portview_cli::run()
}
