// Wingbit Logging
// Native builds log to a file through log4rs; browser builds to the console

use log::LevelFilter;

#[cfg(not(target_arch = "wasm32"))]
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// Install the global logger. `file_path` is ignored in the browser.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_log(level: LevelFilter, file_path: &str) -> Result<(), String> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(file_path)
        .map_err(|e| format!("cannot open log file {}: {}", file_path, e))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| e.to_string())?;
    log4rs::init_config(config).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn init_log(level: LevelFilter, _file_path: &str) -> Result<(), String> {
    let level = level.to_level().unwrap_or(log::Level::Error);
    wasm_logger::init(wasm_logger::Config::new(level));
    Ok(())
}
