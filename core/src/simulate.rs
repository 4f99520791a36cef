//! Running simulations through an external engine.
//!
//! The coalescent simulation itself, mutation placement, and VCF writing are all left to an
//! [`Engine`]. The [`ExternalEngine`] runs a separate program that receives the
//! [`SimulationRequest`] document on stdin and the output path as its only argument.

use std::{
    env,
    ffi::{OsStr, OsString},
    fmt,
    fs::File,
    io::{self, BufReader, Write as _},
    ops::Range,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use noodles_vcf as vcf;
use rand::Rng;

pub mod request;
pub use request::SimulationRequest;

/// A simulation engine.
pub trait Engine {
    /// Simulates the request, writing a VCF to `output`.
    fn run(&self, request: &SimulationRequest, output: &Path) -> Result<(), EngineError>;
}

/// Simulates a request with an engine, and checks that the resulting VCF has the requested
/// sample columns.
pub fn simulate<E>(
    engine: &E,
    request: &SimulationRequest,
    output: &Path,
) -> Result<(), EngineError>
where
    E: Engine + ?Sized,
{
    log::info!(
        "Simulating {} individuals from {} populations over {} bases with seed {}",
        request.individual_names().len(),
        request.samples().sets().len(),
        request.sequence_length(),
        request.random_seed(),
    );

    engine.run(request, output)?;

    check_samples(output, request.individual_names())?;

    log::info!("Wrote simulated genotypes to '{}'", output.display());

    Ok(())
}

/// Checks that the sample names in the header of the VCF at `path` match `expected`.
pub fn check_samples<P>(path: P, expected: &[String]) -> Result<(), EngineError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let output_error = |source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = File::open(path)
        .map(BufReader::new)
        .map(vcf::Reader::new)
        .map_err(output_error)?;
    let header = reader.read_header().map_err(output_error)?;
    let found = header.sample_names();

    let mut found_iter = found.iter();
    for (position, expected_name) in expected.iter().enumerate() {
        match found_iter.next() {
            Some(name) if name == expected_name => (),
            name => {
                return Err(EngineError::SampleMismatch {
                    position,
                    expected: Some(expected_name.clone()),
                    found: name.cloned(),
                })
            }
        }
    }
    if let Some(name) = found_iter.next() {
        return Err(EngineError::SampleMismatch {
            position: expected.len(),
            expected: None,
            found: Some(name.clone()),
        });
    }

    Ok(())
}

/// An engine running in a separate process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalEngine {
    program: PathBuf,
}

impl ExternalEngine {
    /// Program run when none is configured.
    pub const DEFAULT_PROGRAM: &'static str = "msprime-engine";

    /// Environment variable overriding the default program.
    pub const ENV_KEY_PROGRAM: &'static str = "HUB_MODEL_ENGINE";

    pub fn new<P>(program: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            program: program.into(),
        }
    }

    /// Creates an engine running the program named by [`Self::ENV_KEY_PROGRAM`] if set, and
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
}

impl Engine for ExternalEngine {
    fn run(&self, request: &SimulationRequest, output: &Path) -> Result<(), EngineError> {
        log::debug!(
            "Running '{} {}'",
            self.program.display(),
            output.display()
        );

        let mut child = Command::new(&self.program)
            .arg(output)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let written = match child.stdin.take() {
            Some(mut stdin) => request.write_json(&mut stdin).and_then(|()| stdin.flush()),
            None => Ok(()),
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(EngineError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        // Unread request data is an error even when the engine succeeds
        written?;

        Ok(())
    }
}

impl Default for ExternalEngine {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Seeds accepted by engines, `1..2^32 - 1`.
pub const SEED_RANGE: Range<u64> = 1..u32::MAX as u64;

/// Draws a random seed in [`SEED_RANGE`].
pub fn random_seed<R>(rng: &mut R) -> u64
where
    R: Rng + ?Sized,
{
    rng.gen_range(SEED_RANGE)
}

/// Returns the output path for an invocation name and suffix.
///
/// This is the file stem of the invocation (typically `argv[0]`) followed by the suffix and a
/// `.vcf` extension, relative to the current directory.
pub fn output_path<S>(invocation: S, suffix: &str) -> PathBuf
where
    S: AsRef<OsStr>,
{
    let invocation = Path::new(invocation.as_ref());

    let mut name = OsString::from(invocation.file_stem().unwrap_or(invocation.as_os_str()));
    name.push(suffix);
    name.push(".vcf");

    PathBuf::from(name)
}

/// An error associated with running a simulation engine.
#[derive(Debug)]
pub enum EngineError {
    /// The engine program could not be started.
    Spawn { program: PathBuf, source: io::Error },
    /// The engine program exited unsuccessfully.
    Failed { program: PathBuf, status: ExitStatus },
    /// The samples in the engine output differ from the requested ones.
    SampleMismatch {
        position: usize,
        expected: Option<String>,
        found: Option<String>,
    },
    /// The engine output could not be read as VCF.
    Output { path: PathBuf, source: io::Error },
    /// I/O error communicating with the engine.
    Io(io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Spawn { program, source } => {
                write!(f, "failed to start engine '{}': {source}", program.display())
            }
            EngineError::Failed { program, status } => {
                write!(f, "engine '{}' failed ({status})", program.display())
            }
            EngineError::SampleMismatch {
                position,
                expected,
                found,
            } => {
                let expected = expected.as_deref().unwrap_or("[none]");
                let found = found.as_deref().unwrap_or("[none]");
                write!(
                    f,
                    "engine output sample {position} is '{found}', expected '{expected}'"
                )
            }
            EngineError::Output { path, source } => {
                write!(f, "failed to read engine output '{}': {source}", path.display())
            }
            EngineError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Spawn { source, .. } | EngineError::Output { source, .. } => {
                Some(source)
            }
            EngineError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        demography::{Demography, Population},
        sample::SampleRequest,
    };

    struct HeaderEngine(Vec<&'static str>);

    impl Engine for HeaderEngine {
        fn run(&self, _request: &SimulationRequest, output: &Path) -> Result<(), EngineError> {
            let mut header = String::from(
                "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT",
            );
            for name in &self.0 {
                header.push('\t');
                header.push_str(name);
            }
            header.push('\n');

            fs::write(output, header).map_err(EngineError::from)
        }
    }

    fn request() -> SimulationRequest {
        let mut demography = Demography::new();
        demography.add_population(Population::new("A", 10.)).unwrap();

        SimulationRequest::new(demography, SampleRequest::uniform(["A"], 2, 2), 1).unwrap()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path("target/debug/hub-model", "_A"),
            PathBuf::from("hub-model_A.vcf")
        );
        assert_eq!(
            output_path("./SupplementaryNote1.py", "_rep3"),
            PathBuf::from("SupplementaryNote1_rep3.vcf")
        );
        assert_eq!(output_path("hub-model", ""), PathBuf::from("hub-model.vcf"));
    }

    #[test]
    fn test_random_seed_range() {
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..1000 {
            let seed = random_seed(&mut rng);
            assert!((1..u64::from(u32::MAX)).contains(&seed));
        }
    }

    #[test]
    fn test_simulate_checks_samples() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("out.vcf");

        simulate(&HeaderEngine(vec!["A-A_1", "A-A_2"]), &request(), &output)?;

        Ok(())
    }

    #[test]
    fn test_simulate_sample_mismatch() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("out.vcf");

        let result = simulate(&HeaderEngine(vec!["A-A_1", "tsk_1"]), &request(), &output);
        assert!(matches!(
            result,
            Err(EngineError::SampleMismatch { position: 1, .. })
        ));

        let result = simulate(&HeaderEngine(vec!["A-A_1"]), &request(), &output);
        assert!(matches!(
            result,
            Err(EngineError::SampleMismatch {
                position: 1,
                found: None,
                ..
            })
        ));

        let result = simulate(
            &HeaderEngine(vec!["A-A_1", "A-A_2", "A-A_3"]),
            &request(),
            &output,
        );
        assert!(matches!(
            result,
            Err(EngineError::SampleMismatch {
                position: 2,
                expected: None,
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn test_external_engine_missing_program() {
        let engine = ExternalEngine::new("/nonexistent/engine/program");
        let dir = tempfile::tempdir().unwrap();

        let result = engine.run(&request(), &dir.path().join("out.vcf"));

        assert!(matches!(result, Err(EngineError::Spawn { .. })));
    }
}
