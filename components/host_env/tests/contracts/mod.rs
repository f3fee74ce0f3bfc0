//! Contract tests: every host honours the same HostEnvironment surface

mod environment_contract;
