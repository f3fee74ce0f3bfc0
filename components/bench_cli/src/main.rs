//! hostbench
//!
//! Entry point of the benchmark harness. Parses the global options, detects
//! the host and hands the remaining arguments to the command dispatcher.

use bench_cli::{dispatch, logging, Cli, HarnessConfig, Harness, PROGRAM};
use benchmarks::{BenchmarkRegistry, BenchmarkRunner};
use clap::Parser as ClapParser;
use host_env::detect;

fn main() {
    let cli = Cli::parse();
    let config = HarnessConfig::from_cli(&cli);
    logging::init(config.log_filter.as_deref());

    let env = detect(config.probe(PROGRAM, cli.command));
    let registry = match BenchmarkRegistry::builtin() {
        Ok(registry) => registry,
        Err(err) => {
            env.print_err(&format!("Error: {}", err));
            env.quit(1)
        }
    };

    let harness = Harness::new(env, registry, BenchmarkRunner::new(&config.suite_root));
    let code = dispatch::main(&harness, harness.env().args());
    harness.env().quit(code)
}
