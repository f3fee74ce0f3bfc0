//! Command dispatch
//!
//! Commands are looked up by name in a static table after alias resolution.
//! A command body is a future handed to [`HostEnvironment::wait`]; the exit
//! code is decided only once it has completed.

use benchmarks::{BenchmarkRegistry, BenchmarkRunner, LookupError, SizeClass};
use core_types::{HarnessError, HarnessResult};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use host_env::HostEnvironment;

/// What a command runs against.
#[derive(Debug)]
pub struct Harness {
    env: HostEnvironment,
    registry: BenchmarkRegistry,
    runner: BenchmarkRunner,
}

impl Harness {
    /// Bundles the environment with the benchmarks it can run.
    pub fn new(env: HostEnvironment, registry: BenchmarkRegistry, runner: BenchmarkRunner) -> Self {
        Self {
            env,
            registry,
            runner,
        }
    }

    /// The host environment.
    pub fn env(&self) -> &HostEnvironment {
        &self.env
    }

    /// The benchmark registry.
    pub fn registry(&self) -> &BenchmarkRegistry {
        &self.registry
    }

    fn program(&self) -> &str {
        self.env.program()
    }
}

type Handler = for<'a> fn(&'a Harness, &'a [String]) -> LocalBoxFuture<'a, HarnessResult<()>>;

const COMMANDS: &[(&str, Handler)] = &[("help", help), ("list", list), ("run", run)];

const ALIASES: &[(&str, &str)] = &[("--help", "help"), ("-h", "help")];

/// Canonical name of `command`.
pub fn resolve_alias(command: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == command)
        .map_or(command, |(_, canonical)| *canonical)
}

/// Names in the command table, in order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _)| *name)
}

fn lookup(name: &str) -> Option<Handler> {
    COMMANDS
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, handler)| *handler)
}

/// Usage text for `program`.
pub fn usage_lines(program: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Usage: {} COMMAND ARG...", program),
        "Available commands:".to_string(),
    ];
    lines.extend(command_names().map(|name| format!("  {}", name)));
    lines
}

/// Dispatches `args` and returns the exit code.
pub fn main(harness: &Harness, args: &[String]) -> i32 {
    let env = harness.env();

    let Some((command, rest)) = args.split_first() else {
        for line in usage_lines(env.program()) {
            env.print_err(&line);
        }
        return 1;
    };

    let canonical = resolve_alias(command);
    let Some(handler) = lookup(canonical) else {
        env.print_err(&format!("Unknown command: {}", command));
        for line in usage_lines(env.program()) {
            env.print_err(&line);
        }
        return 1;
    };

    tracing::debug!(command = canonical, args = ?rest, "dispatching");
    match env.wait(handler(harness, rest)) {
        Ok(()) => 0,
        Err(err) => {
            report(env, canonical, &err);
            1
        }
    }
}

fn report(env: &HostEnvironment, command: &str, err: &HarnessError) {
    if let HarnessError::Usage { summary, guidance } = err {
        env.print_err(summary);
        for line in guidance {
            env.print_err(line);
        }
        return;
    }

    tracing::error!(command, error = %err, "command failed");
    env.print_err(&format!("Error running command {}: {}", command, err));
    for cause in err.causes() {
        env.print_err(&format!("  caused by: {}", cause));
    }
}

fn size_guidance(registry: &BenchmarkRegistry) -> Vec<String> {
    let mut lines = vec!["Available sizes:".to_string()];
    lines.extend(registry.sizes().map(|size| format!("  {}", size)));
    lines
}

fn help<'a>(harness: &'a Harness, _args: &'a [String]) -> LocalBoxFuture<'a, HarnessResult<()>> {
    async move {
        for line in usage_lines(harness.program()) {
            harness.env.print(&line);
        }
        Ok(())
    }
    .boxed_local()
}

fn list<'a>(harness: &'a Harness, args: &'a [String]) -> LocalBoxFuture<'a, HarnessResult<()>> {
    async move {
        let benchmarks = match args {
            [size] => SizeClass::parse(size).and_then(|size| harness.registry.benchmarks(size)),
            _ => None,
        };
        let Some(benchmarks) = benchmarks else {
            return Err(HarnessError::Usage {
                summary: format!("Usage: {} list SIZE", harness.program()),
                guidance: size_guidance(&harness.registry),
            });
        };

        for benchmark in benchmarks {
            harness.env.print(&benchmark.id);
        }
        Ok(())
    }
    .boxed_local()
}

fn run<'a>(harness: &'a Harness, args: &'a [String]) -> LocalBoxFuture<'a, HarnessResult<()>> {
    async move {
        let [size, id] = args else {
            return Err(HarnessError::usage(format!(
                "Usage: {} run SIZE ID",
                harness.program()
            )));
        };

        let benchmark = match harness.registry.lookup(size, id) {
            Ok(benchmark) => benchmark,
            Err(LookupError::UnknownSize(size)) => {
                let mut guidance = vec![format!(
                    "Try '{} list' for a list of valid sizes",
                    harness.program()
                )];
                guidance.extend(size_guidance(&harness.registry));
                return Err(HarnessError::Usage {
                    summary: format!("Unknown benchmark size '{}'", size),
                    guidance,
                });
            }
            Err(LookupError::UnknownBenchmark { size, id }) => {
                let mut guidance = vec![
                    format!(
                        "Try '{} list {}' for a list of {} benchmarks",
                        harness.program(),
                        size,
                        size
                    ),
                    "Available benchmarks:".to_string(),
                ];
                let ids = harness.registry.benchmarks(size).unwrap_or_default();
                guidance.extend(ids.iter().map(|b| format!("  {}", b.id)));
                return Err(HarnessError::Usage {
                    summary: format!("Unknown benchmark '{}' for size '{}'", id, size),
                    guidance,
                });
            }
        };

        let elapsed = harness
            .runner
            .run(benchmark, &harness.env)
            .await
            .map_err(|source| HarnessError::BenchmarkFailed {
                id: benchmark.id.clone(),
                size: benchmark.size.to_string(),
                source: Box::new(source),
            })?;

        harness
            .env
            .print(&format!("{}/{}: {} seconds", benchmark.id, benchmark.size, elapsed));
        Ok(())
    }
    .boxed_local()
}
