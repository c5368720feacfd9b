use blocktodo::cli::{report, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Only needed on Windows consoles; a failure just means plain output
    let _ = enable_ansi_support::enable_ansi_support();

    if let Err(e) = run() {
        std::process::exit(report(&e));
    }
}
