use crate::config::{FileConfig, ProjectConfig};
use crate::core::Language;
use crate::discovery::doxygen::{CompoundOptions, DoxygenSettings, DoxygenSource, XmlInput};
use crate::discovery::python::{split_search_path, PythonModuleSource, WalkOptions};
use crate::discovery::ComponentSource;
use crate::errors::{Error, Result};
use crate::pipeline::OutputMode;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "palettegen")]
#[command(about = "Generate component palettes from documented source code or Python packages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input directory with the documented sources
    pub idir: PathBuf,

    /// Output palette file, or output directory with --split
    pub ofile: PathBuf,

    /// Read components from this Python module instead of IDIR
    #[arg(short, long)]
    pub module: Option<String>,

    /// Keep only components with this tag
    #[arg(short, long, default_value = "")]
    pub tag: String,

    /// Sources are C/C++ headers (default: Python)
    #[arg(short = 'c')]
    pub c_language: bool,

    /// Traverse sub-directories or submodules
    #[arg(short, long)]
    pub recursive: bool,

    /// Write one palette per submodule into OFILE
    #[arg(short = 'S', long)]
    pub split: bool,

    /// Also parse components without boundary markers
    #[arg(short = 's', long)]
    pub parse_all: bool,

    /// Use a pre-generated combined doxygen XML file
    #[arg(long, value_name = "FILE", conflicts_with = "module")]
    pub xml: Option<PathBuf>,

    /// Maximum submodule depth
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Module search roots
    #[arg(long, value_name = "DIRS", env = "PALETTEGEN_PYTHONPATH")]
    pub python_path: Option<String>,

    /// Debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.depth == Some(0) {
            return Err(Error::Configuration("--depth must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn language(&self) -> Language {
        if self.c_language {
            Language::C
        } else {
            Language::Python
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Info
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.split {
            OutputMode::Split
        } else {
            OutputMode::Aggregate
        }
    }

    /// The palette path; `.` in module mode names the file after the module.
    pub fn output_path(&self) -> PathBuf {
        match &self.module {
            Some(module) if !self.split && self.ofile == Path::new(".") => {
                PathBuf::from(format!("{}.palette", module.replace('.', "_")))
            }
            _ => self.ofile.clone(),
        }
    }

    /// Search roots in priority order: option or `PALETTEGEN_PYTHONPATH`,
    /// `PYTHONPATH`, the config file, then the working directory.
    pub fn search_roots(&self, config: &FileConfig, pythonpath: Option<&str>, cwd: &Path) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(list) = &self.python_path {
            roots.extend(split_search_path(list));
        }
        if let Some(list) = pythonpath {
            roots.extend(split_search_path(list));
        }
        roots.extend(config.python.search_paths.iter().cloned());
        roots.push(cwd.to_path_buf());
        roots
    }

    pub fn source(
        &self,
        config: &FileConfig,
        project: &ProjectConfig,
        cwd: &Path,
    ) -> Box<dyn ComponentSource> {
        if let Some(module) = &self.module {
            let pythonpath = std::env::var("PYTHONPATH").ok();
            let options = WalkOptions {
                recursive: self.recursive,
                max_depth: self.depth.or(config.python.max_depth),
            };
            return Box::new(PythonModuleSource::new(
                module.clone(),
                self.search_roots(config, pythonpath.as_deref(), cwd),
                options,
            ));
        }

        let input = match &self.xml {
            Some(path) => XmlInput::File(path.clone()),
            None => XmlInput::Generate(DoxygenSettings {
                project_name: project.name.clone(),
                input: self.idir.clone(),
                recursive: self.recursive,
                language: self.language(),
                overrides: config.doxygen.settings.clone(),
            }),
        };
        Box::new(DoxygenSource::new(
            input,
            CompoundOptions {
                parse_all: self.parse_all,
                language: self.language(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("palettegen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_missing_arguments_fail() {
        assert!(Cli::try_parse_from(["palettegen", "only-one"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-c", "-r", "-s", "-t", "x", "src", "out.palette"]);
        assert_eq!(cli.language(), Language::C);
        assert!(cli.recursive && cli.parse_all);
        assert_eq!(cli.tag, "x");
        assert_eq!(cli.output_mode(), OutputMode::Aggregate);
    }

    #[test]
    fn test_module_mode_dot_output() {
        let cli = parse(&["-m", "pkg.tools", ".", "."]);
        assert_eq!(cli.output_path(), PathBuf::from("pkg_tools.palette"));

        let split = parse(&["-m", "pkg.tools", "-S", ".", "."]);
        assert_eq!(split.output_path(), PathBuf::from("."));
    }

    #[test]
    fn test_search_root_order() {
        let cli = parse(&["--python-path", "/a:/b", "-m", "m", ".", "."]);
        let mut config = FileConfig::default();
        config.python.search_paths.push(PathBuf::from("/c"));

        let roots = cli.search_roots(&config, Some("/p"), Path::new("/cwd"));
        let expected: Vec<PathBuf> = ["/a", "/b", "/p", "/c", "/cwd"].iter().map(PathBuf::from).collect();
        assert_eq!(roots, expected);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let cli = parse(&["-m", "m", "--depth", "0", ".", "."]);
        assert!(matches!(cli.validate(), Err(Error::Configuration(_))));
        assert!(parse(&["-m", "m", "--depth", "2", ".", "."]).validate().is_ok());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["palettegen", "-v", "-q", "a", "b"]).is_err());
    }
}
