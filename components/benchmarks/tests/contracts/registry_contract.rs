//! Registry ordering and lookup

use benchmarks::scheme::SchemeModule;
use benchmarks::{BenchmarkDescriptor, BenchmarkRegistry, LookupError, SizeClass};
use core_types::{HarnessError, Value};
use std::sync::Arc;

fn entry(size: SizeClass, id: &str) -> BenchmarkDescriptor {
    BenchmarkDescriptor {
        size,
        id: id.to_string(),
        dir_name: id.to_string(),
        loader: Arc::new(SchemeModule::new("main.scm")),
        entry_point: "run".to_string(),
        args: vec![Value::Smi(1)],
        expected: Value::Smi(1),
    }
}

#[test]
fn test_builtin_registry_lists_fib_in_every_size() {
    let registry = BenchmarkRegistry::builtin().unwrap();
    for size in SizeClass::ALL {
        let ids: Vec<_> = registry
            .benchmarks(size)
            .unwrap()
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(ids, vec!["schism-eval-fib"]);
    }
}

#[test]
fn test_builtin_expected_values() {
    let registry = BenchmarkRegistry::builtin().unwrap();
    let expected = [("small", 6765), ("medium", 75025), ("large", 832040)];
    for (size, value) in expected {
        let fib = registry.lookup(size, "schism-eval-fib").unwrap();
        assert_eq!(fib.expected, Value::Smi(value), "size {size}");
    }
}

#[test]
fn test_ids_are_unique_per_size_only() {
    let mut registry = BenchmarkRegistry::new();
    registry.register(entry(SizeClass::Small, "a")).unwrap();
    registry.register(entry(SizeClass::Small, "b")).unwrap();
    registry.register(entry(SizeClass::Large, "a")).unwrap();

    assert!(matches!(
        registry.register(entry(SizeClass::Small, "b")),
        Err(HarnessError::DuplicateBenchmark { .. })
    ));
    assert_eq!(registry.benchmarks(SizeClass::Small).unwrap().len(), 2);
    assert!(registry.lookup("large", "a").is_ok());
    assert_eq!(
        registry.lookup("large", "b").unwrap_err(),
        LookupError::UnknownBenchmark {
            size: SizeClass::Large,
            id: "b".to_string()
        }
    );
}

#[test]
fn test_size_names_are_case_sensitive() {
    let registry = BenchmarkRegistry::builtin().unwrap();
    assert_eq!(
        registry.lookup("Small", "schism-eval-fib").unwrap_err(),
        LookupError::UnknownSize("Small".to_string())
    );
}
