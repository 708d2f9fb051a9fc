use crate::config;

/// Load settings, falling back to defaults when the file or environment is broken.
///
/// Runs before logging is up, so problems are reported on stderr and
/// repeated in the log once it exists.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => {
                let msg = format!("invalid config, using defaults: {msg}");
                eprintln!("songdeck: {msg}");
                (config::Settings::default(), Some(msg))
            }
        },
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            let msg = format!("failed to load config, using defaults: {e}");
            eprintln!("songdeck: {msg}");
            (config::Settings::default(), Some(msg))
        }
    }
}
