//! memloop: one-shot runner for a local inference binary with flat-file
//! conversation memory.
//!
//! Each invocation folds two fragments of the memory file into the prompt,
//! runs the model once, appends the new turn to memory, then trims memory
//! with the three-stage heuristic. No arguments are parsed; behavior comes
//! from compiled-in defaults plus `MEMLOOP_*` environment overrides.

mod invoke;
mod pipeline;
mod validate;

use memloop_common::{RunConfig, RunLogger};

fn main() {
    let config = RunConfig::from_env();
    let logger = RunLogger::new(config.log_path.clone());

    if let Err(err) = pipeline::run(&config, &logger) {
        logger.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
