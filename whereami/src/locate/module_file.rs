//! Loader module file name (Windows)

use std::env;
use std::path::{self, PathBuf};

use super::{Capability, LocateStrategy};
use crate::domain::ResolveError;

/// Ask the loader for the main module's file name and make it absolute
///
/// The path is made absolute without resolving links, matching what the
/// loader reports.
#[derive(Debug, Clone, Copy)]
pub struct ModuleFileStrategy;

impl LocateStrategy for ModuleFileStrategy {
    fn capability(&self) -> Capability {
        Capability::ModuleFileName
    }

    fn locate(&self) -> Result<PathBuf, ResolveError> {
        let query_err = |source| ResolveError::Query { strategy: Capability::ModuleFileName, source };
        let module = env::current_exe().map_err(query_err)?;
        path::absolute(module).map_err(query_err)
    }
}
