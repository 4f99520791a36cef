use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Error};

use clap::{value_parser, ArgGroup, Parser, ValueEnum};

use ancestry_cli::{exit_on_error, Logging};
use ancestry_core::{
    model::{self, Departure, Parameters, Variant},
    simulate::{self, random_seed, ExternalEngine, SEED_RANGE},
    SimulationRequest,
};

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulate genotypes under the hub model of Eurasian population history.
///
/// The demography is built from the time at which Western Eurasians leave the hub, given either
/// as one of the documented variants or in years before present. The simulation itself is run
/// by an external engine, which writes a VCF named after the program and the suffix to the
/// current directory.
#[derive(Debug, Parser)]
#[command(name = NAME, version = VERSION, about)]
#[command(group(ArgGroup::new("departure").required(true).args(["variant", "departure_years"])))]
pub struct Cli {
    /// Suffix of the output file name.
    ///
    /// Output is written to `<program><SUFFIX>.vcf` in the current directory.
    #[arg(value_name = "SUFFIX")]
    suffix: String,

    /// Departure variant.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Departure time in years before present.
    #[arg(long, value_name = "YEARS")]
    departure_years: Option<u64>,

    /// Random seed for the simulation.
    ///
    /// Must be between 1 and 2^32 - 2. If unset, a seed is drawn at random and logged at info
    /// level.
    #[arg(short = 's', long, value_parser = value_parser!(u64).range(SEED_RANGE))]
    seed: Option<u64>,

    /// Simulation engine program.
    ///
    /// If unset, the program is read from the `HUB_MODEL_ENGINE` environment variable, falling
    /// back to `msprime-engine`.
    #[arg(long, value_name = "PROGRAM")]
    engine: Option<PathBuf>,

    /// Write the simulation request to a path and exit without simulating.
    ///
    /// Use "-" to write to stdout.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    #[command(flatten)]
    logging: Logging,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum VariantArg {
    /// Departure 43,000 years ago.
    A,
    /// Departure 42,000 years ago.
    B,
    /// Departure 41,000 years ago.
    C,
}

impl From<VariantArg> for Variant {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::A => Variant::A,
            VariantArg::B => Variant::B,
            VariantArg::C => Variant::C,
        }
    }
}

impl Cli {
    fn departure(&self) -> Departure {
        match (self.variant, self.departure_years) {
            (Some(variant), _) => Departure::Variant(variant.into()),
            (None, Some(years)) => Departure::Years(years),
            (None, None) => unreachable!("departure group is required"),
        }
    }

    pub fn run(self) -> Result<(), Error> {
        if self.logging.debug {
            eprintln!("{self:#?}");
        }
        self.logging.init(NAME);

        let parameters = Parameters::new(self.departure())?;
        log::info!(
            "Western Eurasians leave the hub {} years ({} generations) ago",
            parameters.departure().years(),
            parameters.generations(model::Epoch::WeaSplit)
        );

        let demography = model::build(&parameters)?;

        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = random_seed(&mut rand::thread_rng());
                log::info!("Using random seed {seed}");
                seed
            }
        };

        let request = SimulationRequest::new(demography, model::samples(), seed)?;

        if let Some(path) = self.export {
            return export(&request, path);
        }

        let engine = match self.engine {
            Some(program) => ExternalEngine::new(program),
            None => ExternalEngine::from_env(),
        };

        let invocation = env::args_os()
            .next()
            .unwrap_or_else(|| NAME.into());
        let output = simulate::output_path(invocation, &self.suffix);

        simulate::simulate(&engine, &request, &output)?;

        Ok(())
    }
}

fn export(request: &SimulationRequest, path: PathBuf) -> Result<(), Error> {
    if path.as_os_str() == "-" {
        let mut writer = io::stdout().lock();
        request.write_json(&mut writer)?;
        writer.flush()?;
    } else {
        let mut writer = File::create(&path)
            .map(BufWriter::new)
            .with_context(|| format!("failed to create file at '{}'", path.display()))?;
        request
            .write_json(&mut writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write request to '{}'", path.display()))?;
        log::info!("Wrote simulation request to '{}'", path.display());
    }

    Ok(())
}

fn main() {
    exit_on_error(Cli::parse().run())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    fn try_parse_args(cmd: &str) -> Result<Cli, clap::Error> {
        Parser::try_parse_from(cmd.split_whitespace())
    }

    fn parse_args(cmd: &str) -> Cli {
        try_parse_args(cmd).expect("failed to parse command")
    }

    #[test]
    fn test_variant() {
        let cli = parse_args("hub-model _rep1 --variant b");

        assert_eq!(cli.suffix, "_rep1");
        assert_eq!(cli.departure(), Departure::Variant(Variant::B));
        assert_eq!(cli.seed, None);
        assert_eq!(cli.export, None);
    }

    #[test]
    fn test_departure_years() {
        let cli = parse_args("hub-model _x --departure-years 42500 --seed 7");

        assert_eq!(cli.departure(), Departure::Years(42_500));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_seed_range() {
        for seed in ["0", "4294967295", "18446744073709551615"] {
            let result = try_parse_args(&format!("hub-model _x --variant a --seed {seed}"));

            assert_eq!(
                result.unwrap_err().kind(),
                ClapErrorKind::ValueValidation,
                "{seed}"
            );
        }

        let cli = parse_args("hub-model _x --variant a --seed 4294967294");
        assert_eq!(cli.seed, Some(4_294_967_294));
    }

    #[test]
    fn test_departure_required() {
        let result = try_parse_args("hub-model _rep1");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_departure_exclusive() {
        let result = try_parse_args("hub-model _rep1 --variant a --departure-years 42000");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_suffix_required() {
        let result = try_parse_args("hub-model --variant a");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_unknown_variant() {
        let result = try_parse_args("hub-model _rep1 --variant d");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::InvalidValue);
    }

    #[test]
    fn test_engine_and_export() {
        let cli = parse_args("hub-model _A --variant a --engine ./engine --export -");

        assert_eq!(cli.engine, Some(PathBuf::from("./engine")));
        assert_eq!(cli.export, Some(PathBuf::from("-")));
    }
}
