use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match presence::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
