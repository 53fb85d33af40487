// Thu Oct 15 2026 - Alex

use crate::symbol::error::SymbolError;
use crate::symbol::pairs::SymbolPairs;
use msvc_demangler::DemangleFlags;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Turns decorated names into their undecorated form, one output per input,
/// in input order.
pub trait NameDecoder {
    fn name(&self) -> &str;

    /// `scratch` holds the same names as `decorated`, one per line.
    fn decode(&self, scratch: &Path, decorated: &[String]) -> Result<Vec<String>, SymbolError>;

    fn pair(&self, scratch: &Path, decorated: Vec<String>) -> Result<SymbolPairs, SymbolError> {
        let undecorated = self.decode(scratch, &decorated)?;
        SymbolPairs::zip(decorated, undecorated)
    }
}

/// Runs an `undname`-compatible tool over the scratch file and reads one
/// undecorated line per symbol from its stdout.
pub struct UndnameDecoder {
    executable: PathBuf,
}

impl UndnameDecoder {
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }
}

impl NameDecoder for UndnameDecoder {
    fn name(&self) -> &str {
        "undname"
    }

    fn decode(&self, scratch: &Path, _decorated: &[String]) -> Result<Vec<String>, SymbolError> {
        let tool = self.executable.display().to_string();
        log::info!("Running {} on {}", tool, scratch.display());

        let output = Command::new(&self.executable)
            .arg(scratch)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| SymbolError::Spawn { tool: tool.clone(), source })?;

        if !output.status.success() {
            return Err(SymbolError::ToolFailed {
                tool,
                code: output.status.code().unwrap_or(1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// In-process MSVC demangling. Names the demangler rejects are passed
/// through unchanged, which is also how plain C names come out of `undname`.
#[derive(Debug, Default)]
pub struct BuiltinDecoder;

impl NameDecoder for BuiltinDecoder {
    fn name(&self) -> &str {
        "builtin"
    }

    fn decode(&self, _scratch: &Path, decorated: &[String]) -> Result<Vec<String>, SymbolError> {
        Ok(decorated
            .iter()
            .map(|name| demangle(name).unwrap_or_else(|| name.clone()))
            .collect())
    }
}

pub fn demangle(name: &str) -> Option<String> {
    if !is_msvc_mangled(name) {
        return None;
    }

    match msvc_demangler::demangle(name, DemangleFlags::COMPLETE) {
        Ok(out) => Some(out),
        Err(e) => {
            log::trace!("Could not demangle {}: {}", name, e);
            None
        }
    }
}

pub fn is_msvc_mangled(name: &str) -> bool {
    name.starts_with('?')
}
