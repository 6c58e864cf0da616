pub mod config;
pub mod constants;
pub mod env;
pub mod instantiate_run;
pub mod io;
pub mod progress_bars;
