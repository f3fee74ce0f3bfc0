//! Host detection.
//!
//! Detection walks an ordered list of detectors and builds the first host
//! whose predicate matches the probe. The last detector always matches, so
//! detection cannot fail.

use crate::browser::{BrowserContext, BrowserHost};
use crate::host::{Host, HostEnvironment, HostKind};
use crate::process::ProcessHost;
use crate::shell::{ShellHost, ShellPrimitives};

/// Which host features are present.
#[derive(Debug, Default)]
pub struct HostProbe {
    /// Program name used in usage text
    pub program: String,
    /// A page context, if running in a page
    pub window: Option<BrowserContext>,
    /// Arguments of a process runtime, program name excluded
    pub process_argv: Option<Vec<String>>,
    /// Globals of a script-engine shell
    pub shell: ShellPrimitives,
}

impl HostProbe {
    /// Empty probe; only the shell detector will match.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Probe of the running process, with `args` as its argument vector.
    pub fn from_process(program: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(program).with_process_argv(args)
    }

    /// Probe of a shell whose primitives are wired to the running process.
    pub fn native_shell(program: impl Into<String>, script_args: Vec<String>) -> Self {
        Self::new(program).with_shell(ShellPrimitives::native(script_args))
    }

    /// Adds a page context.
    pub fn with_window(mut self, window: BrowserContext) -> Self {
        self.window = Some(window);
        self
    }

    /// Adds a process argument vector.
    pub fn with_process_argv(mut self, args: Vec<String>) -> Self {
        self.process_argv = Some(args);
        self
    }

    /// Replaces the shell primitives.
    pub fn with_shell(mut self, shell: ShellPrimitives) -> Self {
        self.shell = shell;
        self
    }
}

struct Detector {
    kind: HostKind,
    matches: fn(&HostProbe) -> bool,
    build: fn(HostProbe) -> (Vec<String>, Box<dyn Host>),
}

static DETECTORS: [Detector; 3] = [
    Detector {
        kind: HostKind::Browser,
        matches: has_window,
        build: build_browser,
    },
    Detector {
        kind: HostKind::Process,
        matches: has_process_argv,
        build: build_process,
    },
    Detector {
        kind: HostKind::Shell,
        matches: always,
        build: build_shell,
    },
];

fn has_window(probe: &HostProbe) -> bool {
    probe.window.is_some()
}

fn has_process_argv(probe: &HostProbe) -> bool {
    probe.process_argv.is_some()
}

fn always(_: &HostProbe) -> bool {
    true
}

fn build_browser(probe: HostProbe) -> (Vec<String>, Box<dyn Host>) {
    let window = probe.window.unwrap_or_default();
    (window.normalized_args(), Box::new(BrowserHost::new(&window)))
}

fn build_process(probe: HostProbe) -> (Vec<String>, Box<dyn Host>) {
    (
        probe.process_argv.unwrap_or_default(),
        Box::new(ProcessHost::new()),
    )
}

fn build_shell(probe: HostProbe) -> (Vec<String>, Box<dyn Host>) {
    let args = probe.shell.normalized_args();
    (args, Box::new(ShellHost::new(probe.shell)))
}

fn select(probe: &HostProbe) -> &'static Detector {
    DETECTORS
        .iter()
        .find(|detector| (detector.matches)(probe))
        .unwrap_or(&DETECTORS[DETECTORS.len() - 1])
}

/// Kind of host `probe` would select.
pub fn detect_kind(probe: &HostProbe) -> HostKind {
    select(probe).kind
}

/// Selects and builds the host described by `probe`.
///
/// # Examples
///
/// ```
/// use host_env::{detect, HostKind, HostProbe};
///
/// let env = detect(HostProbe::from_process("hostbench", vec!["list".into(), "small".into()]));
/// assert_eq!(env.kind(), HostKind::Process);
/// assert_eq!(env.args(), ["list", "small"]);
/// ```
pub fn detect(probe: HostProbe) -> HostEnvironment {
    let program = probe.program.clone();
    let detector = select(&probe);
    let (args, host) = (detector.build)(probe);
    tracing::debug!(host = %detector.kind, ?args, "detected host");
    HostEnvironment::new(program, args, host)
}
