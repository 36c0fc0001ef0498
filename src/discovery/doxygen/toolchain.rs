//! Drives doxygen and xsltproc to produce one combined XML description.

use crate::core::Language;
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

const GENERAL_SETTINGS: &[(&str, &str)] = &[
    ("OPTIMIZE_OUTPUT_JAVA", "YES"),
    ("AUTOLINK_SUPPORT", "NO"),
    ("IDL_PROPERTY_SUPPORT", "NO"),
    ("EXCLUDE_PATTERNS", "*/web/*, CMakeLists.txt"),
    ("VERBATIM_HEADERS", "NO"),
    ("GENERATE_HTML", "NO"),
    ("GENERATE_LATEX", "NO"),
    ("GENERATE_XML", "YES"),
    ("XML_PROGRAMLISTING", "NO"),
    ("ENABLE_PREPROCESSING", "NO"),
    ("CLASS_DIAGRAMS", "NO"),
];

const C_SETTINGS: &[(&str, &str)] = &[("FILE_PATTERNS", "*.h, *.hpp")];

const PYTHON_SETTINGS: &[(&str, &str)] = &[
    ("FILE_PATTERNS", "*.py"),
    ("EXTRACT_ALL", "YES"),
    ("EXTRACT_PRIVATE", "NO"),
];

/// Settings applied on top of the generated Doxyfile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoxygenSettings {
    pub project_name: String,
    pub input: PathBuf,
    pub recursive: bool,
    pub language: Language,
    /// User overrides, applied last.
    pub overrides: BTreeMap<String, String>,
}

impl DoxygenSettings {
    /// All replacements in the order they are applied; later entries win.
    fn layers(&self, output_dir: &Path) -> Vec<(String, String)> {
        let language = match self.language {
            Language::C => C_SETTINGS,
            Language::Python => PYTHON_SETTINGS,
        };
        let run = [
            ("PROJECT_NAME".to_string(), self.project_name.clone()),
            ("INPUT".to_string(), self.input.display().to_string()),
            ("OUTPUT_DIRECTORY".to_string(), output_dir.display().to_string()),
            (
                "RECURSIVE".to_string(),
                if self.recursive { "YES" } else { "NO" }.to_string(),
            ),
        ];

        GENERAL_SETTINGS
            .iter()
            .chain(language)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .chain(run)
            .chain(self.overrides.clone())
            .collect()
    }
}

fn setting_key(line: &str) -> Option<&str> {
    line.split_once('=').map(|(key, _)| key.trim())
}

/// Rewrite a Doxyfile: drop comments and blank lines, replace known keys.
pub fn patch_config(contents: &str, settings: &[(String, String)]) -> String {
    let mut resolved: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, value) in settings {
        resolved.insert(key.as_str(), value.as_str());
    }

    let mut patched = String::with_capacity(contents.len());
    for line in contents.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        match setting_key(line).and_then(|key| resolved.get_key_value(key)) {
            Some((key, value)) => {
                patched.push_str(&format!("{} = {}\n", key, value));
            }
            None => {
                patched.push_str(line);
                patched.push('\n');
            }
        }
    }
    patched
}

/// Resolved locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub doxygen: PathBuf,
    pub xsltproc: PathBuf,
}

impl Toolchain {
    pub fn locate() -> Result<Self> {
        let find = |tool: &str| {
            which::which(tool).map_err(|e| Error::toolchain(tool, format!("not found on PATH: {}", e)))
        };
        Ok(Self {
            doxygen: find("doxygen")?,
            xsltproc: find("xsltproc")?,
        })
    }

    fn run(&self, program: &Path, args: &[&str], dir: &Path, stdout: Stdio) -> Result<()> {
        let tool = program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        log::debug!("Running {} {}", tool, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(stdout)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::toolchain(&tool, format!("failed to start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::toolchain(
                tool,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(())
    }

    /// Run the whole chain and return the combined XML text.
    ///
    /// Everything is written inside a fresh temporary directory which is
    /// removed when this returns.
    pub fn generate_xml(&self, settings: &DoxygenSettings) -> Result<String> {
        let workdir = TempDir::new()?;
        let dir = workdir.path();
        let doxyfile = dir.join("Doxyfile");

        self.run(&self.doxygen, &["-g", "Doxyfile"], dir, Stdio::null())?;
        if !doxyfile.exists() {
            return Err(Error::missing_artifact(&doxyfile));
        }
        log::info!("Wrote doxygen configuration file to {}", doxyfile.display());

        let generated = fs::read_to_string(&doxyfile)?;
        fs::write(&doxyfile, patch_config(&generated, &settings.layers(dir)))?;

        self.run(&self.doxygen, &["Doxyfile"], dir, Stdio::null())?;

        let xml_dir = dir.join("xml");
        for artifact in ["index.xml", "combine.xslt"] {
            let path = xml_dir.join(artifact);
            if !path.exists() {
                return Err(Error::missing_artifact(path));
            }
        }

        let combined = xml_dir.join("doxygen.xml");
        let target = fs::File::create(&combined)?;
        self.run(
            &self.xsltproc,
            &["combine.xslt", "index.xml"],
            &xml_dir,
            Stdio::from(target),
        )?;
        log::info!("Wrote combined doxygen XML to {}", combined.display());

        Ok(fs::read_to_string(&combined)?)
    }
}
