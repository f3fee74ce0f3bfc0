//! Contract tests: registry lookups and runs behave the same on every host

mod registry_contract;
mod runner_contract;
