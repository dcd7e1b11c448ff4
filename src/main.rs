use std::process::ExitCode;

use assetsweep::ScanError;

fn main() -> ExitCode {
    match assetsweep::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<ScanError>()
                .map(ScanError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
