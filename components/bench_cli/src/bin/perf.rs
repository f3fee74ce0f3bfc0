//! hostbench-perf
//!
//! Runs the image-kernel suite for one size class and exits non-zero when an
//! output hash does not match.

use bench_cli::config::host_probe;
use bench_cli::{logging, PerfCli};
use benchmarks::{perf, SizeClass};
use clap::Parser as ClapParser;
use host_env::detect;

fn main() {
    let cli = PerfCli::parse();
    logging::init(cli.log.as_deref());

    let size = match cli.size.as_deref().map(|name| (name, SizeClass::parse(name))) {
        Some((_, Some(size))) => size,
        Some((name, None)) => {
            tracing::warn!(size = name, "unknown size, running small");
            SizeClass::Small
        }
        None => SizeClass::Small,
    };

    let env = detect(host_probe(cli.host, "hostbench-perf", Vec::new()));
    match env.wait(perf::run_suite(&env, size, cli.samples)) {
        Ok(()) => env.quit(0),
        Err(err) => {
            tracing::error!(%size, error = %err, "perf suite failed");
            env.print_err(&format!("Error: {}", err));
            for cause in err.causes() {
                env.print_err(&format!("  caused by: {}", cause));
            }
            env.quit(1)
        }
    }
}
