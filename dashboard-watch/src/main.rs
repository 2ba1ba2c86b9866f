fn main() {
    if let Err(err) = telemetry_dashboard::app::run_watch() {
        eprintln!("watch startup failed: {err}");
        std::process::exit(1);
    }
}
