//! Map editor - headless map export

use std::process::ExitCode;

fn main() -> ExitCode {
    match mapeditor_cli::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
