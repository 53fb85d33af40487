// Fri Oct 16 2026 - Alex

use crate::symbol::demangle::demangle;
use crate::symbol::error::SymbolError;
use goblin::archive::Archive;
use memmap2::Mmap;
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Source of the externally visible symbols of one static library.
pub trait LibrarySymbolReader: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the decorated names of symbols defined by `library` whose
    /// undecorated form matches `filter`, in symbol table order.
    fn read_symbols(&self, library: &Path, filter: &Regex) -> Result<Vec<String>, SymbolError>;
}

/// Shells out to `dumpbin /SYMBOLS`. A record looks like
///
/// ```text
/// 02E 00000000 SECT2  notype ()    External     | ?foo@@YAXXZ (void __cdecl foo(void))
/// ```
pub struct DumpbinReader {
    executable: PathBuf,
}

impl DumpbinReader {
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }
}

impl LibrarySymbolReader for DumpbinReader {
    fn name(&self) -> &str {
        "dumpbin"
    }

    fn read_symbols(&self, library: &Path, filter: &Regex) -> Result<Vec<String>, SymbolError> {
        let tool = self.executable.display().to_string();

        let output = Command::new(&self.executable)
            .arg("/SYMBOLS")
            .arg(library)
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

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(filter_records(text.lines(), filter))
    }
}

/// Keeps external records the library defines whose undecorated form
/// matches `filter`, and returns their decorated names.
pub fn filter_records<'a>(lines: impl Iterator<Item = &'a str>, filter: &Regex) -> Vec<String> {
    lines
        .filter(|line| is_defined_external(line))
        .filter_map(|line| {
            let name = symbol_column(line)?;
            let undecorated = undecorated_column(line).unwrap_or(name);
            filter.is_match(undecorated).then(|| name.to_string())
        })
        .collect()
}

/// `UNDEF` records are references to symbols defined elsewhere.
fn is_defined_external(record: &str) -> bool {
    let Some((columns, _)) = record.split_once('|') else {
        return false;
    };
    let mut columns = columns.split_whitespace();
    let section = columns.nth(2);
    section.is_some_and(|s| s != "UNDEF") && columns.any(|c| c == "External")
}

/// The symbol name is the first token after the `|` separator.
pub fn symbol_column(record: &str) -> Option<&str> {
    let (_, rest) = record.split_once('|')?;
    rest.split_whitespace().next()
}

/// The parenthesised undecorated name following the symbol, if dumpbin
/// printed one.
pub fn undecorated_column(record: &str) -> Option<&str> {
    let (_, rest) = record.split_once('|')?;
    let rest = rest.trim();
    let open = rest.find(" (")?;
    rest[open + 2..].strip_suffix(')')
}

/// Reads the archive symbol index directly. The linker member only lists
/// defined symbols. Each one is matched on its undecorated form, as with
/// `DumpbinReader`.
#[derive(Debug, Default)]
pub struct ArchiveReader;

impl LibrarySymbolReader for ArchiveReader {
    fn name(&self) -> &str {
        "archive"
    }

    fn read_symbols(&self, library: &Path, filter: &Regex) -> Result<Vec<String>, SymbolError> {
        let file = File::open(library)?;
        let mmap = unsafe { Mmap::map(&file) }?;

        let archive = Archive::parse(&mmap).map_err(|e| SymbolError::LibraryParse {
            path: library.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut symbols = Vec::new();
        for (member, _, member_symbols) in archive.summarize() {
            log::trace!("{}: member {} has {} symbols", library.display(), member, member_symbols.len());
            for symbol in member_symbols {
                if filter.is_match(&undecorated_form(symbol)) {
                    symbols.push(symbol.to_string());
                }
            }
        }

        Ok(symbols)
    }
}

fn undecorated_form(symbol: &str) -> String {
    demangle(symbol).unwrap_or_else(|| symbol.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
COFF SYMBOL TABLE
000 01047A0F ABS    notype       Static       | @comp.id
02E 00000000 SECT2  notype ()    External     | ?Foo@@YAXXZ (void __cdecl Foo(void))
02F 00000000 UNDEF  notype ()    External     | ?Bar@@YAXXZ (void __cdecl Bar(void))
030 00000000 SECT4  notype       Static       | ?Foo@@3HA (int Foo)
031 00000008 SECT5  notype       External     | ?kFoo@@3HA (int kFoo)
032 00000000 SECT6  notype ()    External     | TFE_NewOp
";

    #[test]
    fn test_symbol_column() {
        assert_eq!(
            symbol_column("02E 00000000 SECT2  notype ()    External     | ?Foo@@YAXXZ (void)"),
            Some("?Foo@@YAXXZ")
        );
        assert_eq!(symbol_column("no separator here"), None);
        assert_eq!(symbol_column("trailing |   "), None);
    }

    #[test]
    fn test_filter_records_keeps_external_matches() {
        let filter = Regex::new("Foo").unwrap();
        let symbols = filter_records(DUMP.lines(), &filter);
        assert_eq!(symbols, vec!["?Foo@@YAXXZ", "?kFoo@@3HA"]);
    }

    #[test]
    fn test_filter_records_with_alternation() {
        let filter = Regex::new("Foo|TFE_").unwrap();
        let symbols = filter_records(DUMP.lines(), &filter);
        assert_eq!(symbols, vec!["?Foo@@YAXXZ", "?kFoo@@3HA", "TFE_NewOp"]);
    }

    #[test]
    fn test_filter_records_skips_undefined() {
        let filter = Regex::new("Bar").unwrap();
        assert!(filter_records(DUMP.lines(), &filter).is_empty());
    }

    #[test]
    fn test_filter_records_anchored_on_undecorated() {
        let filter = Regex::new("(?:^TFE_)").unwrap();
        assert_eq!(filter_records(DUMP.lines(), &filter), vec!["TFE_NewOp"]);

        let filter = Regex::new("^void __cdecl Foo").unwrap();
        assert_eq!(filter_records(DUMP.lines(), &filter), vec!["?Foo@@YAXXZ"]);
    }

    #[test]
    fn test_filter_records_ignores_column_text() {
        for column in ["(?:SECT)", "External", "notype", "00000000"] {
            let filter = Regex::new(column).unwrap();
            assert!(filter_records(DUMP.lines(), &filter).is_empty(), "{}", column);
        }
    }

    #[test]
    fn test_undecorated_column() {
        assert_eq!(
            undecorated_column("02E 00000000 SECT2 notype () External | ?Foo@@YAXXZ (void __cdecl Foo(void))"),
            Some("void __cdecl Foo(void)")
        );
        assert_eq!(undecorated_column("032 00000000 SECT6 notype () External | TFE_NewOp"), None);
    }

    #[test]
    fn test_archive_reader_rejects_non_archive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"definitely not an archive").unwrap();

        let err = ArchiveReader
            .read_symbols(file.path(), &Regex::new(".").unwrap())
            .unwrap_err();
        assert!(matches!(err, SymbolError::LibraryParse { .. }));
    }

    #[test]
    fn test_undecorated_form_plain_name() {
        assert_eq!(undecorated_form("TF_Foo"), "TF_Foo");
    }
}
