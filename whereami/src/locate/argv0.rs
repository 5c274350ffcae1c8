//! Executable path reconstruction from `argv[0]`
//!
//! Used where the kernel reports no path for a process, only its argument
//! vector and the identity of its text file. The chain resolves `argv[0]` the
//! way a shell resolved the command, and every candidate must match the
//! kernel's file identity before it is accepted.
//!
//! Order of candidates for one token:
//!
//! 1. Token starts with `/`: the token itself.
//! 2. Token has no `/`, or a `:` before its first `/`: each `PATH` entry joined
//!    with the token, then with the part before the `:` (if any).
//! 3. `PATH` exhausted: the same search once over `$HOME/bin` plus
//!    [`DEFAULT_SEARCH_PATH`]. This happens at most once per resolution.
//! 4. Token not absolute: `$PWD/token`, then `getcwd()/token`.
//!
//! The token is `argv[0]` first; if that yields nothing, `$_` is tried as a
//! second and final token.

use std::env;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use log::debug;
use whereami_common::{
    DEFAULT_SEARCH_PATH, ENV_HOME, ENV_PATH, ENV_PWD, ENV_UNDERSCORE, SEARCH_PATH_SEPARATOR,
};

use super::text_image::query_text_image;
use super::{Capability, LocateStrategy};
use crate::domain::{Pid, ResolveError, TextImage};
use crate::identity::Verifier;
use crate::paths::split_search_list;

/// Read-only inputs of one resolution, captured from the process
///
/// Values are kept as raw bytes: a directory name need not be UTF-8.
/// Empty values are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainInputs {
    /// First element of the argument vector; `None` if the vector is empty
    pub argv0: Option<OsString>,
    /// `PATH`
    pub search_path: Option<OsString>,
    /// `HOME`
    pub home: Option<OsString>,
    /// `PWD`
    pub pwd: Option<OsString>,
    /// `_`
    pub underscore: Option<OsString>,
    /// `getcwd()`
    pub cwd: Option<OsString>,
}

impl ChainInputs {
    /// Capture the inputs of the running process
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            argv0: env::args_os().next(),
            search_path: env_var(ENV_PATH),
            home: env_var(ENV_HOME),
            pwd: env_var(ENV_PWD),
            underscore: env_var(ENV_UNDERSCORE),
            cwd: env::current_dir().ok().map(PathBuf::into_os_string),
        }
    }
}

fn env_var(key: &str) -> Option<OsString> {
    env::var_os(key).filter(|value| !value.is_empty())
}

fn present(value: Option<&OsString>) -> Option<&[u8]> {
    value.map(|v| v.as_bytes()).filter(|v| !v.is_empty())
}

/// `dir/name`, byte for byte
fn join(dir: &[u8], name: &[u8]) -> PathBuf {
    let parts: [&[u8]; 3] = [dir, b"/", name];
    PathBuf::from(OsStr::from_bytes(&parts.concat()))
}

/// Which token a candidate was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Argv0,
    /// Restart with `$_` after the `argv[0]` pass found nothing
    Underscore,
}

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Token starting with `/`
    Absolute,
    /// Entry of `PATH`
    SearchPath,
    /// Entry of `$HOME/bin` + [`DEFAULT_SEARCH_PATH`]
    DefaultSearchPath,
    /// `$PWD`
    PwdEnv,
    /// `getcwd()`
    CurrentDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Verified(PathBuf),
    Rejected,
}

/// One candidate tried during a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionAttempt {
    pub pass: Pass,
    pub source: CandidateSource,
    pub candidate: PathBuf,
    pub outcome: Outcome,
}

/// Result of running the chain, with every attempt in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: Option<PathBuf>,
    pub attempts: Vec<ResolutionAttempt>,
}

impl Resolution {
    /// Attempts that came from `source`
    pub fn attempts_from(&self, source: CandidateSource) -> impl Iterator<Item = &ResolutionAttempt> {
        self.attempts.iter().filter(move |a| a.source == source)
    }
}

/// Positions of the first `/` and first `:` in a token
#[derive(Debug, Clone, Copy)]
struct TokenShape {
    slash: Option<usize>,
    colon: Option<usize>,
}

impl TokenShape {
    fn of(token: &[u8]) -> Self {
        Self {
            slash: token.iter().position(|&b| b == b'/'),
            colon: token.iter().position(|&b| b == SEARCH_PATH_SEPARATOR),
        }
    }

    fn is_absolute(self) -> bool {
        self.slash == Some(0)
    }

    /// Bare command name, or a `name:rest` token whose `:` precedes any `/`
    fn searches_path(self) -> bool {
        match (self.slash, self.colon) {
            (None, _) => true,
            (Some(slash), Some(colon)) => slash > colon,
            (Some(_), None) => false,
        }
    }

    /// Part of the token before a `:` that precedes any `/`
    fn colon_prefix(self, token: &[u8]) -> Option<&[u8]> {
        let colon = self.colon?;
        match self.slash {
            Some(slash) if slash < colon => None,
            _ => Some(&token[..colon]),
        }
    }
}

/// Run the chain against `image`
///
/// Terminates after at most one pass per token (`argv[0]`, then `$_`) and at
/// most one default-list search across both passes.
#[must_use]
pub fn resolve_chain(inputs: &ChainInputs, image: &TextImage) -> Resolution {
    let mut walk = Walk {
        inputs,
        verifier: Verifier::new(image),
        attempts: Vec::new(),
        default_search_used: false,
    };
    let path = walk.run();
    Resolution { path, attempts: walk.attempts }
}

struct Walk<'a> {
    inputs: &'a ChainInputs,
    verifier: Verifier<'a>,
    attempts: Vec<ResolutionAttempt>,
    default_search_used: bool,
}

impl<'a> Walk<'a> {
    fn run(&mut self) -> Option<PathBuf> {
        let inputs = self.inputs;
        // An empty argument vector leaves nothing to reconstruct from.
        let argv0 = inputs.argv0.as_ref()?;

        let tokens = [
            (Pass::Argv0, present(Some(argv0))),
            (Pass::Underscore, present(inputs.underscore.as_ref())),
        ];
        for (pass, token) in tokens {
            let Some(token) = token else {
                continue;
            };
            if let Some(path) = self.run_pass(pass, token) {
                return Some(path);
            }
        }
        None
    }

    fn run_pass(&mut self, pass: Pass, token: &[u8]) -> Option<PathBuf> {
        let shape = TokenShape::of(token);
        if shape.is_absolute() {
            let candidate = PathBuf::from(OsStr::from_bytes(token));
            return self.attempt(pass, CandidateSource::Absolute, candidate);
        }
        if shape.searches_path() {
            if let Some(path) = self.search(pass, token, shape) {
                return Some(path);
            }
        }
        self.search_working_dir(pass, token)
    }

    fn search(&mut self, pass: Pass, token: &[u8], shape: TokenShape) -> Option<PathBuf> {
        let inputs = self.inputs;
        let prefix = shape.colon_prefix(token);

        if let Some(list) = present(inputs.search_path.as_ref()) {
            if let Some(path) = self.search_list(pass, CandidateSource::SearchPath, list, token, prefix)
            {
                return Some(path);
            }
        }

        if std::mem::replace(&mut self.default_search_used, true) {
            return None;
        }
        let fallback = match present(inputs.home.as_ref()) {
            Some(home) => {
                let parts: [&[u8]; 4] =
                    [home, b"/bin", &[SEARCH_PATH_SEPARATOR], DEFAULT_SEARCH_PATH.as_bytes()];
                parts.concat()
            }
            None => DEFAULT_SEARCH_PATH.as_bytes().to_vec(),
        };
        self.search_list(pass, CandidateSource::DefaultSearchPath, &fallback, token, prefix)
    }

    fn search_list(
        &mut self,
        pass: Pass,
        source: CandidateSource,
        list: &[u8],
        token: &[u8],
        prefix: Option<&[u8]>,
    ) -> Option<PathBuf> {
        for entry in split_search_list(list) {
            if let Some(path) = self.attempt(pass, source, join(entry, token)) {
                return Some(path);
            }
            if let Some(prefix) = prefix {
                if let Some(path) = self.attempt(pass, source, join(entry, prefix)) {
                    return Some(path);
                }
            }
        }
        None
    }

    fn search_working_dir(&mut self, pass: Pass, token: &[u8]) -> Option<PathBuf> {
        let inputs = self.inputs;
        if let Some(pwd) = present(inputs.pwd.as_ref()) {
            if let Some(path) = self.attempt(pass, CandidateSource::PwdEnv, join(pwd, token)) {
                return Some(path);
            }
        }
        let cwd = present(inputs.cwd.as_ref())?;
        self.attempt(pass, CandidateSource::CurrentDir, join(cwd, token))
    }

    fn attempt(&mut self, pass: Pass, source: CandidateSource, candidate: PathBuf) -> Option<PathBuf> {
        let verified = self.verifier.verify(&candidate);
        debug!("argv0 {pass:?}/{source:?}: {} -> {verified:?}", candidate.display());
        let outcome = verified.clone().map_or(Outcome::Rejected, Outcome::Verified);
        self.attempts.push(ResolutionAttempt { pass, source, candidate, outcome });
        verified
    }
}

/// The argv0 chain as a [`LocateStrategy`]
#[derive(Debug, Clone)]
pub struct Argv0Strategy {
    pid: Pid,
    inputs: ChainInputs,
}

impl Argv0Strategy {
    #[must_use]
    pub fn new(pid: Pid, inputs: ChainInputs) -> Self {
        Self { pid, inputs }
    }

    /// Chain over the running process's pid, arguments and environment
    #[must_use]
    pub fn from_process() -> Self {
        Self::new(Pid::current(), ChainInputs::from_process())
    }
}

impl LocateStrategy for Argv0Strategy {
    fn capability(&self) -> Capability {
        Capability::Argv0Chain
    }

    fn locate(&self) -> Result<PathBuf, ResolveError> {
        // Without the kernel's identity there is nothing to verify against.
        let image = query_text_image(self.pid)?;
        if self.inputs.argv0.is_none() {
            return Err(ResolveError::MissingArgv0);
        }
        resolve_chain(&self.inputs, &image).path.ok_or(ResolveError::NoMatch)
    }
}
