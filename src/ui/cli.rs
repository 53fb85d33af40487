// Sat Oct 17 2026 - Alex

use crate::config::{read_lib_paths_file, Bitness, Config, DecoderKind, LibReaderKind, MAX_EXPORTS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deffilter")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Builds a filtered module-definition (.def) export list for a Windows DLL")]
#[command(long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct CliInterface {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, num_args = 1.., help = "Raw symbol listings to read, in order")]
    pub input: Vec<PathBuf>,

    #[arg(short, long, help = "Output .def file")]
    pub output: Option<PathBuf>,

    #[arg(short, long, help = "Library name written on the LIBRARY line")]
    pub target: Option<String>,

    #[arg(long, value_enum, default_value = "64", help = "Target bitness, selects curated symbol decorations")]
    pub bitness: Bitness,

    #[arg(long, help = "Catalog of per-library symbol patterns")]
    pub symbols: Option<PathBuf>,

    #[arg(long, num_args = 1.., help = "Libraries to scan for catalog symbols")]
    pub lib_paths: Vec<PathBuf>,

    #[arg(long, help = "File listing library paths, one per line")]
    pub lib_paths_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "undname", help = "How decorated names are decoded")]
    pub decoder: DecoderKind,

    #[arg(long, default_value = "undname.exe", help = "Path to the undname tool")]
    pub undname: PathBuf,

    #[arg(long, value_enum, default_value = "dumpbin", help = "How library symbol tables are read")]
    pub lib_reader: LibReaderKind,

    #[arg(long, default_value = "dumpbin.exe", help = "Path to the dumpbin tool")]
    pub dumpbin: PathBuf,

    #[arg(long, help = "JSON file overriding the filter rules")]
    pub rules: Option<PathBuf>,

    #[arg(long, default_value_t = MAX_EXPORTS, help = "Warn when more symbols than this are exported")]
    pub max_exports: usize,

    #[arg(long, help = "Write run statistics as JSON")]
    pub stats_json: Option<PathBuf>,

    #[arg(long, help = "Keep the decoder scratch file at this path")]
    pub scratch: Option<PathBuf>,

    #[arg(long, help = "Scan libraries one at a time")]
    pub sequential: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, help = "Quiet mode - no logging, no summary")]
    pub quiet: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, help = "Write this run's log to a file; warnings still go to stderr")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Write the built-in filter rules as JSON")]
    DumpRules {
        #[arg(help = "Where to write the rules file")]
        output: PathBuf,
    },
}

impl CliInterface {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Result<Config, String> {
        let output = self
            .output
            .clone()
            .ok_or_else(|| "--output is required".to_string())?;

        let mut lib_paths = self.lib_paths.clone();
        if let Some(file) = &self.lib_paths_file {
            let listed = read_lib_paths_file(file)
                .map_err(|e| format!("Cannot read {}: {}", file.display(), e))?;
            lib_paths.extend(listed);
        }

        let mut config = Config::new()
            .with_inputs(self.input.clone())
            .with_output(output)
            .with_bitness(self.bitness)
            .with_decoder(self.decoder)
            .with_lib_reader(self.lib_reader);

        if let Some(target) = &self.target {
            config = config.with_target(target.clone());
        }
        if let Some(rules) = &self.rules {
            config = config.with_rules_file(rules.clone());
        }
        if let Some(catalog) = &self.symbols {
            config = config.with_library_scope(catalog.clone(), lib_paths);
        } else {
            config.lib_paths = lib_paths;
        }
        if let Some(scratch) = &self.scratch {
            config = config.with_scratch_file(scratch.clone());
        }
        if self.quiet {
            config = config.without_progress();
        }

        config.undname_path = self.undname.clone();
        config.dumpbin_path = self.dumpbin.clone();
        config.max_exports = self.max_exports;
        config.stats_json = self.stats_json.clone();
        config.parallel_scan = !self.sequential;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_command_line() {
        let cli = CliInterface::try_parse_from([
            "deffilter",
            "--input", "a.def", "b.def",
            "--output", "out.def",
            "--target", "tensorflow.dll",
            "--bitness", "32",
            "--symbols", "symbols.txt",
            "--lib-paths", "libA.lib", "libB.lib",
            "--decoder", "builtin",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let config = cli.to_config().unwrap();
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.bitness, Bitness::X86);
        assert_eq!(config.decoder, DecoderKind::Builtin);
        assert_eq!(config.target.as_deref(), Some("tensorflow.dll"));
        assert!(config.library_scope().is_some());
    }

    #[test]
    fn test_output_required() {
        let cli = CliInterface::try_parse_from(["deffilter", "--input", "a.def"]).unwrap();
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_input_required() {
        let cli = CliInterface::try_parse_from(["deffilter", "--output", "out.def"]).unwrap();
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_dump_rules_subcommand() {
        let cli = CliInterface::try_parse_from(["deffilter", "dump-rules", "rules.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::DumpRules { .. })));
    }

    #[test]
    fn test_catalog_alone_disables_scope() {
        let cli = CliInterface::try_parse_from([
            "deffilter", "-i", "a.def", "-o", "out.def", "--symbols", "symbols.txt",
        ])
        .unwrap();
        assert!(cli.to_config().unwrap().library_scope().is_none());
    }
}
