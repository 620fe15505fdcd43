// Library surface for headless/integration tests and reuse.
// The TUI front end (main.rs, ui.rs) stays out of the library.
pub mod app_dirs;
pub mod config;
pub mod logger;
pub mod results;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod util;
pub mod word_generator;
pub mod wordlist;
