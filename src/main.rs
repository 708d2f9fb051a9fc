mod app;
mod audio;
mod config;
mod library;
mod logging;
mod mpris;
mod player;
mod runtime;
mod time_format;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
