use zbb_budget::cli::run_cli;

fn main() {
    if let Err(err) = run_cli() {
        tracing::debug!(error = %err, "command failed");
        eprintln!("Error: {}", err.user_message());
        std::process::exit(1);
    }
}
