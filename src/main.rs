//! Binary entrypoint: builds one demonstration expression, runs backward, and prints
//! the derivative at the root.
//!
//! Configured through the environment (see [`chaingrad::config`]):
//! `CHAINGRAD_INPUT`, `CHAINGRAD_SCENARIO`, `CHAINGRAD_LOG_LEVEL`. `RUST_LOG`, when set,
//! takes precedence over `CHAINGRAD_LOG_LEVEL`.

use std::process::ExitCode;

use chaingrad::config::{self, Config, ConfigError};
use chaingrad::Variable;
use log::{debug, error, info, warn};

fn load_config() -> Result<Config, ConfigError> {
    let cfg = config::from_env()?;
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> ExitCode {
    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            // The logger is configured from this config, so report directly.
            eprintln!("invalid configuration: {}", e.message());
            return ExitCode::FAILURE;
        }
    };
    let env = env_logger::Env::default().default_filter_or(cfg.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    info!("scenario {} at x = {}", cfg.scenario, cfg.input);
    let x = Variable::new(cfg.input);
    let out = match cfg.scenario.build(&x) {
        Ok(out) => out,
        Err(e) => {
            error!("{} step of {} failed: {e}", e.op(), cfg.scenario);
            return ExitCode::FAILURE;
        }
    };
    info!("value: {}", out.value());

    out.backward();
    for (step, node) in out.lineage().enumerate() {
        let label = node
            .operation()
            .map_or_else(|| "root".to_string(), |op| op.to_string());
        debug!("{step:2}: {label:<10} value {} grad {:?}", node.value(), node.grad());
    }

    let expected = cfg.scenario.expected_grad(cfg.input);
    match x.grad() {
        Some(grad) => {
            if (grad - expected).abs() > 1e-9 * expected.abs().max(1.0) {
                warn!("gradient {grad} differs from closed form {expected}");
            }
            println!("{grad}");
        }
        None => println!("none"),
    }
    ExitCode::SUCCESS
}
