/// Installs the global logger. Call once, before anything logs.
#[cfg(not(target_family = "wasm"))]
pub(crate) fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second init only happens in tests, where the first logger is fine.
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(target_family = "wasm")]
pub(crate) fn init() {
    if log::set_logger(&console::CONSOLE_LOGGER).is_ok() {
        log::set_max_level(console::MAX_LEVEL);
    }
}

#[cfg(target_family = "wasm")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use wasm_bindgen::JsValue;

    pub(super) const MAX_LEVEL: LevelFilter = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    pub(super) static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

    /// Forwards records to the browser's devtools console.
    pub(super) struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= MAX_LEVEL
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let message = JsValue::from_str(&format!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            ));
            match record.level() {
                Level::Error => web_sys::console::error_1(&message),
                Level::Warn => web_sys::console::warn_1(&message),
                Level::Info => web_sys::console::info_1(&message),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
            }
        }

        fn flush(&self) {}
    }
}
