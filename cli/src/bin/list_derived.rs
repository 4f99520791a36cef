use std::path::{Path, PathBuf};

use anyhow::Error;

use clap::{ArgGroup, Parser};

use rand::{rngs::StdRng, SeedableRng};

use ancestry_cli::{exit_on_error, Logging};
use ancestry_core::derived::{HeterozygousPolicy, Plink, Runner};

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// List the sites at which individuals carry a derived allele.
///
/// For each individual, plink computes genotype counts restricted to that individual, and the
/// sites where the individual is homozygous for the derived allele are written to
/// `derived_alleles_<IID>.snps`. Heterozygous sites are included with probability one half,
/// unless `--all` is set. The dataset must code the ancestral allele as A1 (for example with
/// plink `--reference-allele`).
#[derive(Debug, Parser)]
#[command(name = NAME, version = VERSION, about)]
#[command(group(ArgGroup::new("list").required(true).args(["indlist", "poplist"])))]
pub struct Cli {
    /// Input plink fileset prefix.
    ///
    /// Expects `<DATASET>.bed`, `<DATASET>.bim`, and `<DATASET>.fam` to exist.
    #[arg(short = 'd', long, value_name = "DATASET")]
    dataset: PathBuf,

    /// List of individuals to analyse.
    ///
    /// One individual per line, given by family ID followed by individual ID. Output is
    /// written to the current directory.
    #[arg(short = 'i', long, value_name = "PATH")]
    indlist: Option<PathBuf>,

    /// List of populations to analyse.
    ///
    /// One population per line, matched against the family ID column of the `.fam` file. For
    /// each population, a directory of the same name is created in the current directory,
    /// holding the selected individual list and results.
    #[arg(short = 'p', long, value_name = "PATH")]
    poplist: Option<PathBuf>,

    /// Include all heterozygous sites.
    ///
    /// Output is then written to `derived_alleles_allhet_<IID>.snps`.
    #[arg(short = 'a', long)]
    all: bool,

    /// Random seed for choosing heterozygous sites.
    ///
    /// If unset, the seed is taken from system entropy.
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Path to plink.
    ///
    /// If unset, the program is read from the `LIST_DERIVED_PLINK` environment variable,
    /// falling back to `plink`.
    #[arg(long, value_name = "PROGRAM")]
    plink: Option<PathBuf>,

    #[command(flatten)]
    logging: Logging,
}

impl Cli {
    fn policy(&self) -> HeterozygousPolicy {
        if self.all {
            HeterozygousPolicy::AlwaysInclude
        } else {
            HeterozygousPolicy::Probabilistic
        }
    }

    pub fn run(self) -> Result<(), Error> {
        if self.logging.debug {
            eprintln!("{self:#?}");
        }
        self.logging.init(NAME);

        let plink = match &self.plink {
            Some(program) => Plink::new(program),
            None => Plink::from_env(),
        };
        log::debug!("Using plink at '{}'", plink.program().display());

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut runner = Runner::new(plink, self.policy(), rng);
        let cwd = Path::new("");

        match (&self.indlist, &self.poplist) {
            (Some(indlist), _) => {
                let classified = runner.run_individuals(indlist, &self.dataset, cwd)?;
                log::info!("Listed derived sites for {} individuals", classified.len());
            }
            (None, Some(poplist)) => {
                let results = runner.run_populations(poplist, &self.dataset, cwd)?;
                log::info!("Listed derived sites for {} populations", results.len());
            }
            (None, None) => unreachable!("list group is required"),
        }

        Ok(())
    }
}

fn main() {
    exit_on_error(Cli::parse().run())
}
