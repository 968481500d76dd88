use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = regionkit::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
