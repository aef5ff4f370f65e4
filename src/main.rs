use std::process::ExitCode;

fn main() -> ExitCode {
    match eda_reports::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("eda: {}", err.message());
            ExitCode::from(err.exit_code())
        }
    }
}
