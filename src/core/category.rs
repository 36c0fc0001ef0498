use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Node category as understood by the graph editor.
///
/// The known set is closed; anything else is carried as `Unknown` so an
/// unexpected category degrades to a warning instead of a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    PythonApp,
    PyFuncApp,
    DynlibApp,
    BashShellApp,
    Mpi,
    Docker,
    Singularity,
    Branch,
    File,
    Memory,
    SharedMemory,
    Ngas,
    S3,
    Plasma,
    PlasmaFlight,
    ParameterSet,
    EnvironmentVariables,
    Scatter,
    Gather,
    Unknown(String),
}

impl Category {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "PythonApp" => Self::PythonApp,
            "PyFuncApp" => Self::PyFuncApp,
            "DynlibApp" => Self::DynlibApp,
            "BashShellApp" => Self::BashShellApp,
            "Mpi" => Self::Mpi,
            "Docker" => Self::Docker,
            "Singularity" => Self::Singularity,
            "Branch" => Self::Branch,
            "File" => Self::File,
            "Memory" => Self::Memory,
            "SharedMemory" => Self::SharedMemory,
            "NGAS" => Self::Ngas,
            "S3" => Self::S3,
            "Plasma" => Self::Plasma,
            "PlasmaFlight" => Self::PlasmaFlight,
            "ParameterSet" => Self::ParameterSet,
            "EnvironmentVariables" => Self::EnvironmentVariables,
            "Scatter" => Self::Scatter,
            "Gather" => Self::Gather,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PythonApp => "PythonApp",
            Self::PyFuncApp => "PyFuncApp",
            Self::DynlibApp => "DynlibApp",
            Self::BashShellApp => "BashShellApp",
            Self::Mpi => "Mpi",
            Self::Docker => "Docker",
            Self::Singularity => "Singularity",
            Self::Branch => "Branch",
            Self::File => "File",
            Self::Memory => "Memory",
            Self::SharedMemory => "SharedMemory",
            Self::Ngas => "NGAS",
            Self::S3 => "S3",
            Self::Plasma => "Plasma",
            Self::PlasmaFlight => "PlasmaFlight",
            Self::ParameterSet => "ParameterSet",
            Self::EnvironmentVariables => "EnvironmentVariables",
            Self::Scatter => "Scatter",
            Self::Gather => "Gather",
            Self::Unknown(text) => text,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Categories whose nodes run code.
    pub fn is_execution_bearing(&self) -> bool {
        matches!(
            self,
            Self::DynlibApp
                | Self::PythonApp
                | Self::PyFuncApp
                | Self::Branch
                | Self::BashShellApp
                | Self::Mpi
                | Self::Docker
        )
    }

    /// Categories whose nodes hold data between applications.
    pub fn is_data_artifact(&self) -> bool {
        matches!(
            self,
            Self::File
                | Self::Memory
                | Self::Ngas
                | Self::ParameterSet
                | Self::Plasma
                | Self::PlasmaFlight
                | Self::S3
        )
    }

    /// Categories launched through a command line.
    pub fn is_shell_style(&self) -> bool {
        matches!(
            self,
            Self::BashShellApp | Self::Mpi | Self::Docker | Self::Singularity
        )
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

/// The kind of wrapper a component asks to be placed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    Scatter,
    Gather,
    Unknown(String),
}

impl ConstructKind {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "Scatter" => Self::Scatter,
            "Gather" => Self::Gather,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scatter => "Scatter",
            Self::Gather => "Gather",
            Self::Unknown(text) => text,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Scatter => Category::Scatter,
            Self::Gather => Category::Gather,
            Self::Unknown(text) => Category::parse(text),
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
