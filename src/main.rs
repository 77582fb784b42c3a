mod app;
mod audio;
mod catalog;
mod config;
mod lyrics;
mod mpris;
mod runtime;
mod session;
mod ui;

fn main() {
    if let Err(err) = runtime::run() {
        tracing::error!("{err:?}");
        eprintln!("lyricdeck: {err:#}");
        std::process::exit(1);
    }
}
