//! Benchmark registry
//!
//! Benchmarks are grouped by size class. Both the classes and the benchmarks
//! within a class keep their registration order, which is the order `list`
//! prints them in.

use crate::scheme::SchemeModule;
use crate::unit::UnitLoader;
use core_types::{HarnessError, HarnessResult, Value};
use std::fmt;
use std::sync::Arc;

/// Directory holding the suites shipped with this crate.
pub const DEFAULT_SUITE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/suites");

/// Input size class of a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Quick runs, suitable for smoke tests
    Small,
    /// Default measurement size
    Medium,
    /// Long runs
    Large,
}

impl SizeClass {
    /// Every size class, smallest first.
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    /// Parses a lowercase size name.
    pub fn parse(name: &str) -> Option<SizeClass> {
        Self::ALL.into_iter().find(|size| size.as_str() == name)
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to run and verify one benchmark.
#[derive(Clone)]
pub struct BenchmarkDescriptor {
    /// Size class the benchmark is registered under
    pub size: SizeClass,
    /// Id, unique within the size class
    pub id: String,
    /// Directory of the unit, relative to the suite root
    pub dir_name: String,
    /// Produces the unit
    pub loader: Arc<dyn UnitLoader>,
    /// Entry point to call
    pub entry_point: String,
    /// Arguments passed after the environment
    pub args: Vec<Value>,
    /// Value the entry point must return
    pub expected: Value,
}

impl fmt::Debug for BenchmarkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkDescriptor")
            .field("size", &self.size)
            .field("id", &self.id)
            .field("dir_name", &self.dir_name)
            .field("entry_point", &self.entry_point)
            .field("args", &self.args)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Why a lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No such size class
    UnknownSize(String),
    /// The size class exists but has no benchmark with that id
    UnknownBenchmark {
        /// Size class that was searched
        size: SizeClass,
        /// Requested id
        id: String,
    },
}

/// Ordered mapping size class → id → descriptor.
#[derive(Debug, Default)]
pub struct BenchmarkRegistry {
    classes: Vec<(SizeClass, Vec<BenchmarkDescriptor>)>,
}

impl BenchmarkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of benchmarks shipped with the harness.
    pub fn builtin() -> HarnessResult<Self> {
        let mut registry = Self::new();
        let fib = Arc::new(SchemeModule::new("main.scm"));
        for (size, n, expected) in [
            (SizeClass::Small, 20, 6765),
            (SizeClass::Medium, 25, 75025),
            (SizeClass::Large, 30, 832040),
        ] {
            registry.register(BenchmarkDescriptor {
                size,
                id: "schism-eval-fib".to_string(),
                dir_name: "schism-eval-fib".to_string(),
                loader: fib.clone(),
                entry_point: "run".to_string(),
                args: vec![Value::Smi(n)],
                expected: Value::Smi(expected),
            })?;
        }
        Ok(registry)
    }

    /// Adds `descriptor`, keeping registration order.
    ///
    /// Fails if the id is already taken within the descriptor's size class.
    pub fn register(&mut self, descriptor: BenchmarkDescriptor) -> HarnessResult<()> {
        let size = descriptor.size;
        let index = match self.classes.iter().position(|(s, _)| *s == size) {
            Some(index) => index,
            None => {
                self.classes.push((size, Vec::new()));
                self.classes.len() - 1
            }
        };

        let benchmarks = &mut self.classes[index].1;
        if benchmarks.iter().any(|b| b.id == descriptor.id) {
            return Err(HarnessError::DuplicateBenchmark {
                size: size.to_string(),
                id: descriptor.id,
            });
        }
        benchmarks.push(descriptor);
        Ok(())
    }

    /// Size classes with at least one benchmark, in registration order.
    pub fn sizes(&self) -> impl Iterator<Item = SizeClass> + '_ {
        self.classes.iter().map(|(size, _)| *size)
    }

    /// Benchmarks of `size`, in registration order. `None` for an unregistered class.
    pub fn benchmarks(&self, size: SizeClass) -> Option<&[BenchmarkDescriptor]> {
        self.classes
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, benchmarks)| benchmarks.as_slice())
    }

    /// Finds the benchmark named `id` in the class named `size`.
    pub fn lookup(&self, size: &str, id: &str) -> Result<&BenchmarkDescriptor, LookupError> {
        let benchmarks = SizeClass::parse(size)
            .and_then(|class| self.benchmarks(class).map(|b| (class, b)));
        let Some((class, benchmarks)) = benchmarks else {
            return Err(LookupError::UnknownSize(size.to_string()));
        };
        benchmarks
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| LookupError::UnknownBenchmark {
                size: class,
                id: id.to_string(),
            })
    }
}
