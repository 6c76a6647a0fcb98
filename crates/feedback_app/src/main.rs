mod app;
mod effects;
mod logging;
mod render;

fn main() {
    logging::initialize(logging::LogDestination::File);
    if let Err(err) = app::run() {
        eprintln!("buzzguard client error: {err}");
        std::process::exit(1);
    }
}
