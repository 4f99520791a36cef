use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use rand::Rng;

use super::{
    frqx, plink::with_suffix, Descriptor, Error, HeterozygousPolicy, Intermediates, Plink,
};

/// File name of the individual list written to each population directory.
pub const POPULATION_INDLIST: &str = "indlist.txt";

/// The result of listing derived sites for one individual.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Classified {
    pub individual_id: String,
    pub sites: usize,
    pub path: PathBuf,
}

/// Lists derived sites for individuals, one at a time.
#[derive(Debug)]
pub struct Runner<R> {
    plink: Plink,
    policy: HeterozygousPolicy,
    rng: R,
}

impl<R> Runner<R>
where
    R: Rng,
{
    pub fn new(plink: Plink, policy: HeterozygousPolicy, rng: R) -> Self {
        Self { plink, policy, rng }
    }

    /// Lists derived sites for a single individual, writing them to `outdir`.
    ///
    /// Intermediate files are written to `outdir` as well, and removed afterwards.
    pub fn classify<D>(
        &mut self,
        descriptor: &Descriptor,
        dataset: D,
        outdir: &Path,
    ) -> Result<Classified, Error>
    where
        D: AsRef<OsStr>,
    {
        let individual_id = descriptor.individual_id();
        log::info!("Identifying sites with derived allele for sample {individual_id}");

        let intermediates = Intermediates::new(outdir.join(individual_id));

        let keep = intermediates.keep();
        fs::write(&keep, format!("{}\n", descriptor.line())).map_err(Error::io(&keep))?;

        self.plink.freqx(dataset, &keep, intermediates.prefix())?;

        let table = intermediates.frqx();
        let sites = File::open(&table)
            .map(BufReader::new)
            .and_then(|reader| frqx::derived_sites(reader, self.policy, &mut self.rng))
            .map_err(Error::io(&table))?;

        let path = outdir.join(self.policy.output_name(individual_id));
        write_lines(&path, &sites).map_err(Error::io(&path))?;

        log::info!("{individual_id} has {} sites with derived allele", sites.len());

        intermediates
            .remove()
            .map_err(Error::io(intermediates.prefix()))?;

        Ok(Classified {
            individual_id: individual_id.to_string(),
            sites: sites.len(),
            path,
        })
    }

    /// Lists derived sites for every individual in an individual list, writing results to
    /// `outdir`.
    ///
    /// The list has one descriptor per line, blank lines are skipped.
    pub fn run_individuals<D>(
        &mut self,
        indlist: &Path,
        dataset: D,
        outdir: &Path,
    ) -> Result<Vec<Classified>, Error>
    where
        D: AsRef<OsStr>,
    {
        let reader = File::open(indlist)
            .map(BufReader::new)
            .map_err(Error::io(indlist))?;

        let mut classified = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(Error::io(indlist))?;
            if line.trim().is_empty() {
                continue;
            }

            let descriptor = line
                .parse::<Descriptor>()
                .map_err(|source| Error::Descriptor {
                    path: indlist.to_path_buf(),
                    line_number: i + 1,
                    source,
                })?;

            classified.push(self.classify(&descriptor, dataset.as_ref(), outdir)?);
        }

        Ok(classified)
    }

    /// Lists derived sites for every individual of every population in a population list.
    ///
    /// For each population, a directory named after it is created in `root`, holding the
    /// individual list selected from the `.fam` file of the dataset and the results.
    pub fn run_populations<D>(
        &mut self,
        poplist: &Path,
        dataset: D,
        root: &Path,
    ) -> Result<Vec<(String, Vec<Classified>)>, Error>
    where
        D: AsRef<OsStr>,
    {
        let dataset = dataset.as_ref();
        let fam = with_suffix(dataset, ".fam");

        let populations = fs::read_to_string(poplist)
            .map_err(Error::io(poplist))?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        let mut results = Vec::with_capacity(populations.len());
        for population in populations {
            log::info!("Analysing {population}");

            let outdir = root.join(&population);
            fs::create_dir_all(&outdir).map_err(Error::io(&outdir))?;

            let lines = File::open(&fam)
                .map(BufReader::new)
                .and_then(|reader| select_population(reader, &population))
                .map_err(Error::io(&fam))?;
            if lines.is_empty() {
                log::warn!(
                    "No individuals of population '{population}' found in '{}'",
                    fam.display()
                );
            }

            let indlist = outdir.join(POPULATION_INDLIST);
            write_lines(&indlist, &lines).map_err(Error::io(&indlist))?;

            let classified = self.run_individuals(&indlist, dataset, &outdir)?;
            results.push((population, classified));
        }

        Ok(results)
    }
}

/// Returns the lines of a `.fam` file whose family ID equals `population`.
///
/// The family ID must match the first token exactly, so that `POP1` does not select `POP10`.
pub fn select_population<B>(reader: B, population: &str) -> io::Result<Vec<String>>
where
    B: BufRead,
{
    reader
        .lines()
        .filter(|line| match line {
            Ok(line) => line.split_whitespace().next() == Some(population),
            Err(_) => true,
        })
        .collect()
}

fn write_lines<S>(path: &Path, lines: &[S]) -> io::Result<()>
where
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()
}
