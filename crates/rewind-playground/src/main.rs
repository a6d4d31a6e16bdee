#![forbid(unsafe_code)]

fn main() {
    let json = std::env::args().any(|arg| arg == "--json");
    if let Err(error) = rewind_playground::run_from_env() {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
