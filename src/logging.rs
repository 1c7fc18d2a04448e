use env_logger::Builder;
use log::{LevelFilter, info};

pub fn init_logging() {
    #[cfg(debug_assertions)]
    let default_level = LevelFilter::Debug;
    #[cfg(not(debug_assertions))]
    let default_level = LevelFilter::Info;
    Builder::from_default_env()
        .filter_level(LevelFilter::Off)
        .filter_module("natbridge", default_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    info!("Logging system initialized");
}
