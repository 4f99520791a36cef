//! Running plink.

use std::{
    env,
    ffi::{OsStr, OsString},
    fmt, fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

/// The plink genotype analysis tool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plink {
    program: PathBuf,
}

impl Plink {
    /// Program run when none is configured.
    pub const DEFAULT_PROGRAM: &'static str = "plink";

    /// Environment variable overriding the default program.
    pub const ENV_KEY_PROGRAM: &'static str = "LIST_DERIVED_PLINK";

    pub fn new<P>(program: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            program: program.into(),
        }
    }

    /// Creates a tool running the program named by [`Self::ENV_KEY_PROGRAM`] if set, and
    /// [`Self::DEFAULT_PROGRAM`] otherwise.
    pub fn from_env() -> Self {
        match env::var_os(Self::ENV_KEY_PROGRAM) {
            Some(program) if !program.is_empty() => Self::new(program),
            _ => Self::new(Self::DEFAULT_PROGRAM),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Computes genotype counts for the individuals listed in `keep`, writing them to
    /// `<out>.frqx`.
    ///
    /// Standard output of plink is discarded, standard error is passed through.
    pub fn freqx<D>(&self, dataset: D, keep: &Path, out: &Path) -> Result<(), ToolError>
    where
        D: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command
            .arg("--bfile")
            .arg(dataset)
            .arg("--keep-allele-order")
            .arg("--freqx")
            .arg("--keep")
            .arg(keep)
            .arg("--out")
            .arg(out)
            .stdout(Stdio::null());

        log::debug!("Running {command:?}");

        let status = command.status().map_err(|source| ToolError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

impl Default for Plink {
    fn default() -> Self {
        Self::from_env()
    }
}

/// The intermediate files of a single plink run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Intermediates {
    prefix: PathBuf,
}

impl Intermediates {
    /// Creates the intermediate file set for a prefix, like `<dir>/<individual>`.
    pub fn new<P>(prefix: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The individual selection file passed to `--keep`.
    pub fn keep(&self) -> PathBuf {
        with_suffix(&self.prefix, ".txt")
    }

    /// The frequency table written by plink.
    pub fn frqx(&self) -> PathBuf {
        with_suffix(&self.prefix, ".frqx")
    }

    pub fn log(&self) -> PathBuf {
        with_suffix(&self.prefix, ".log")
    }

    /// Lists individuals with ambiguous sex. Only written by plink when there are any.
    pub fn nosex(&self) -> PathBuf {
        with_suffix(&self.prefix, ".nosex")
    }

    pub fn paths(&self) -> [PathBuf; 4] {
        [self.log(), self.frqx(), self.nosex(), self.keep()]
    }

    /// Removes all intermediate files, skipping those that do not exist.
    pub fn remove(&self) -> io::Result<()> {
        for path in self.paths() {
            match fs::remove_file(&path) {
                Ok(()) => log::trace!("Removed '{}'", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("No intermediate file '{}' to remove", path.display())
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// Appends a suffix to a path.
///
/// Unlike [`Path::with_extension`], this keeps anything after a dot in the file name, as in
/// individual IDs like `Ancestor.REF`.
pub(crate) fn with_suffix<P, S>(path: P, suffix: S) -> PathBuf
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let mut s = OsString::from(path.as_ref());
    s.push(suffix);
    PathBuf::from(s)
}

/// An error associated with running plink.
#[derive(Debug)]
pub enum ToolError {
    /// The program could not be started.
    Spawn { program: PathBuf, source: io::Error },
    /// The program exited unsuccessfully.
    Failed { program: PathBuf, status: ExitStatus },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Spawn { program, source } => {
                write!(f, "failed to start '{}': {source}", program.display())
            }
            ToolError::Failed { program, status } => {
                write!(f, "'{}' failed ({status})", program.display())
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Spawn { source, .. } => Some(source),
            ToolError::Failed { .. } => None,
        }
    }
}
