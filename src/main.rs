fn main() {
    if let Err(err) = telemetry_dashboard::app::run() {
        eprintln!("dashboard startup failed: {err}");
        std::process::exit(1);
    }
}
