// Fri Oct 16 2026 - Alex

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Linker limit on the number of exported symbols in one DLL.
pub const MAX_EXPORTS: usize = 65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Bitness {
    #[value(name = "32")]
    #[serde(rename = "32")]
    X86,
    #[value(name = "64")]
    #[serde(rename = "64")]
    X64,
}

impl Bitness {
    /// Decorated `tensorflow::OpDef::~OpDef`, which must always be exported.
    pub fn opdef_destructor(self) -> &'static str {
        match self {
            Bitness::X86 => "??1OpDef@tensorflow@@UAE@XZ",
            Bitness::X64 => "??1OpDef@tensorflow@@UEAA@XZ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// External `undname` tool
    Undname,
    /// In-process MSVC demangler
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LibReaderKind {
    /// External `dumpbin /SYMBOLS`
    Dumpbin,
    /// In-process archive symbol index
    Archive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub target: Option<String>,
    pub bitness: Bitness,
    pub symbols_catalog: Option<PathBuf>,
    pub lib_paths: Vec<PathBuf>,
    pub decoder: DecoderKind,
    pub undname_path: PathBuf,
    pub lib_reader: LibReaderKind,
    pub dumpbin_path: PathBuf,
    pub rules_file: Option<PathBuf>,
    pub max_exports: usize,
    pub stats_json: Option<PathBuf>,
    pub scratch_file: Option<PathBuf>,
    pub parallel_scan: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("exports.def"),
            target: None,
            bitness: Bitness::X64,
            symbols_catalog: None,
            lib_paths: Vec::new(),
            decoder: DecoderKind::Undname,
            undname_path: PathBuf::from("undname.exe"),
            lib_reader: LibReaderKind::Dumpbin,
            dumpbin_path: PathBuf::from("dumpbin.exe"),
            rules_file: None,
            max_exports: MAX_EXPORTS,
            stats_json: None,
            scratch_file: None,
            parallel_scan: true,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    pub fn with_target(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_bitness(mut self, bitness: Bitness) -> Self {
        self.bitness = bitness;
        self
    }

    pub fn with_library_scope(mut self, catalog: PathBuf, lib_paths: Vec<PathBuf>) -> Self {
        self.symbols_catalog = Some(catalog);
        self.lib_paths = lib_paths;
        self
    }

    pub fn with_decoder(mut self, decoder: DecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_lib_reader(mut self, reader: LibReaderKind) -> Self {
        self.lib_reader = reader;
        self
    }

    pub fn with_rules_file(mut self, rules: PathBuf) -> Self {
        self.rules_file = Some(rules);
        self
    }

    pub fn with_scratch_file(mut self, scratch: PathBuf) -> Self {
        self.scratch_file = Some(scratch);
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Catalog and library paths, when both were given. Either one alone
    /// means no library-scoped symbols were requested.
    pub fn library_scope(&self) -> Option<(&Path, &[PathBuf])> {
        match &self.symbols_catalog {
            Some(catalog) if !self.lib_paths.is_empty() => Some((catalog.as_path(), self.lib_paths.as_slice())),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.is_empty() {
            return Err("At least one input symbol list is required".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("Output path must not be empty".to_string());
        }
        if self.max_exports == 0 {
            return Err("max_exports must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Reads a file listing one library path per line.
pub fn read_lib_paths_file<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<PathBuf>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_scope_needs_both_halves() {
        let config = Config::new().with_inputs(vec![PathBuf::from("a.def")]);
        assert!(config.library_scope().is_none());

        let mut catalog_only = config.clone();
        catalog_only.symbols_catalog = Some(PathBuf::from("symbols.txt"));
        assert!(catalog_only.library_scope().is_none());

        let mut paths_only = config.clone();
        paths_only.lib_paths = vec![PathBuf::from("libA.lib")];
        assert!(paths_only.library_scope().is_none());

        let both = config.with_library_scope(PathBuf::from("symbols.txt"), vec![PathBuf::from("libA.lib")]);
        let (catalog, libs) = both.library_scope().unwrap();
        assert_eq!(catalog, Path::new("symbols.txt"));
        assert_eq!(libs.len(), 1);
    }

    #[test]
    fn test_validate() {
        assert!(Config::new().validate().is_err());
        assert!(Config::new().with_inputs(vec![PathBuf::from("a.def")]).validate().is_ok());
    }

    #[test]
    fn test_opdef_destructor_by_bitness() {
        assert_eq!(Bitness::X64.opdef_destructor(), "??1OpDef@tensorflow@@UEAA@XZ");
        assert_eq!(Bitness::X86.opdef_destructor(), "??1OpDef@tensorflow@@UAE@XZ");
    }

    #[test]
    fn test_read_lib_paths_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"C:/out/libA.lib\n\n  C:/out/libB.lib \n").unwrap();
        let paths = read_lib_paths_file(file.path()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("C:/out/libA.lib"), PathBuf::from("C:/out/libB.lib")]);
    }
}
