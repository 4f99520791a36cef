//! Listing sites carrying derived alleles.
//!
//! For each individual, plink is run on a dataset in which the ancestral allele is the first
//! allele, restricted to that individual, and the resulting genotype count table is used to
//! find the sites where the individual carries a derived allele. See [`frqx`] for the decision
//! rule, and [`Runner`] for batches of individuals and populations.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

pub mod descriptor;
pub use descriptor::{Descriptor, ParseDescriptorError};

pub mod frqx;
pub use frqx::{derived_sites, Row};

pub mod plink;
pub use plink::{Intermediates, Plink, ToolError};

mod runner;
pub use runner::{select_population, Classified, Runner};

/// How to treat sites where an individual is heterozygous.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum HeterozygousPolicy {
    /// Include the site with probability one half, as if sampling one allele.
    #[default]
    Probabilistic,
    /// Always include the site.
    AlwaysInclude,
}

impl HeterozygousPolicy {
    /// Returns the output file name for an individual.
    pub fn output_name(&self, individual_id: &str) -> String {
        match self {
            HeterozygousPolicy::Probabilistic => format!("derived_alleles_{individual_id}.snps"),
            HeterozygousPolicy::AlwaysInclude => {
                format!("derived_alleles_allhet_{individual_id}.snps")
            }
        }
    }
}

/// An error associated with listing derived sites.
#[derive(Debug)]
pub enum Error {
    /// I/O error on a file.
    Io { path: PathBuf, source: io::Error },
    /// Line in an individual list is not a descriptor.
    Descriptor {
        path: PathBuf,
        line_number: usize,
        source: ParseDescriptorError,
    },
    /// The external tool failed.
    Tool(ToolError),
}

impl Error {
    pub(crate) fn io<P>(path: P) -> impl FnOnce(io::Error) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        move |source| Self::Io { path, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "'{}': {source}", path.display()),
            Error::Descriptor {
                path,
                line_number,
                source,
            } => write!(f, "'{}' line {line_number}: {source}", path.display()),
            Error::Tool(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Descriptor { source, .. } => Some(source),
            Error::Tool(e) => Some(e),
        }
    }
}

impl From<ToolError> for Error {
    fn from(e: ToolError) -> Self {
        Self::Tool(e)
    }
}
