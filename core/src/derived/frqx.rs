//! Reading plink `.frqx` genotype count tables.
//!
//! Tables have one whitespace-separated row per site, with the site ID in the second column,
//! the heterozygote count in the sixth, and the count of homozygotes for the second allele in
//! the seventh. Since the ancestral allele is kept as the first allele, the latter counts
//! homozygotes for the derived allele. Tables are produced for single individuals, so counts
//! are either `0` or `1`.

use std::{fmt, io};

use rand::Rng;

use super::HeterozygousPolicy;

const SITE_COLUMN: usize = 1;
const HET_COLUMN: usize = 5;
const HOM_DERIVED_COLUMN: usize = 6;

/// A row of a frequency table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Row<'a> {
    pub site: &'a str,
    pub het: &'a str,
    pub hom_derived: &'a str,
}

impl<'a> Row<'a> {
    /// Parses a row, returning `None` if it has too few columns.
    pub fn parse(s: &'a str) -> Option<Self> {
        let tokens = s.split_whitespace().collect::<Vec<_>>();

        if tokens.len() > HOM_DERIVED_COLUMN {
            Some(Self {
                site: tokens[SITE_COLUMN],
                het: tokens[HET_COLUMN],
                hom_derived: tokens[HOM_DERIVED_COLUMN],
            })
        } else {
            None
        }
    }

    /// Returns `true` if the individual carries the derived allele at this site.
    ///
    /// Homozygous sites are always included. Heterozygous sites are included either always, or
    /// with probability one half, depending on the policy. Only heterozygous sites under the
    /// probabilistic policy consume randomness.
    pub fn is_derived<R>(&self, policy: HeterozygousPolicy, rng: &mut R) -> bool
    where
        R: Rng,
    {
        if self.hom_derived == "1" {
            true
        } else if self.het == "1" {
            match policy {
                HeterozygousPolicy::AlwaysInclude => true,
                HeterozygousPolicy::Probabilistic => rng.gen_bool(0.5),
            }
        } else {
            false
        }
    }
}

/// Reads a frequency table and returns the IDs of sites carrying the derived allele, in row
/// order.
///
/// Empty lines are skipped, other lines with too few columns are an error.
pub fn derived_sites<B, R>(
    reader: B,
    policy: HeterozygousPolicy,
    rng: &mut R,
) -> io::Result<Vec<String>>
where
    B: io::BufRead,
    R: Rng,
{
    let mut sites = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row = Row::parse(&line).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                ParseRowError {
                    line_number: i + 1,
                    columns: line.split_whitespace().count(),
                },
            )
        })?;

        if row.is_derived(policy, rng) {
            sites.push(row.site.to_string());
        }
    }

    Ok(sites)
}

/// An error associated with a frequency table row with too few columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseRowError {
    line_number: usize,
    columns: usize,
}

impl fmt::Display for ParseRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frequency table line {} has {} columns, expected at least {}",
            self.line_number,
            self.columns,
            HOM_DERIVED_COLUMN + 1
        )
    }
}

impl std::error::Error for ParseRowError {}
