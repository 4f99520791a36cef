//! The request document sent to simulation engines.
//!
//! The document is a single JSON object, naming populations by string:
//!
//! ```text
//! {
//!   "populations": [{"name", "initial_size", "growth_rate", "default_sampling_time"}, ..],
//!   "events": [{"type": "admixture" | "mass_migration" | "population_split", "time", ..}, ..],
//!   "samples": [{"population", "num_samples", "ploidy"}, ..],
//!   "individual_names": [..],
//!   "sequence_length", "recombination_rate", "mutation_rate", "random_seed"
//! }
//! ```
//!
//! Events are listed in time order, times are in generations, and a `null` sampling time means
//! the population is sampled at the present.

use std::io;

use serde::Serialize;

use crate::{
    demography::{Demography, Event, PopulationId},
    sample::{SampleRequest, UnknownPopulationError},
};

/// Total sequence length in bases.
pub const SEQUENCE_LENGTH: u64 = 3_000_000_000;

/// Recombination rate per base per generation.
pub const RECOMBINATION_RATE: f64 = 1e-8;

/// Mutation rate per base per generation.
pub const MUTATION_RATE: f64 = 1.25e-8;

/// Everything an engine needs to simulate a VCF.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationRequest {
    demography: Demography,
    samples: SampleRequest,
    individual_names: Vec<String>,
    sequence_length: u64,
    recombination_rate: f64,
    mutation_rate: f64,
    random_seed: u64,
}

impl SimulationRequest {
    /// Creates a new request with the default sequence length and rates.
    ///
    /// Events of the demography are sorted if they are not already.
    pub fn new(
        mut demography: Demography,
        samples: SampleRequest,
        random_seed: u64,
    ) -> Result<Self, UnknownPopulationError> {
        samples.check(&demography)?;

        if !demography.is_sorted() {
            demography.sort_events();
        }
        let individual_names = samples.individual_names();

        Ok(Self {
            demography,
            samples,
            individual_names,
            sequence_length: SEQUENCE_LENGTH,
            recombination_rate: RECOMBINATION_RATE,
            mutation_rate: MUTATION_RATE,
            random_seed,
        })
    }

    pub fn demography(&self) -> &Demography {
        &self.demography
    }

    pub fn samples(&self) -> &SampleRequest {
        &self.samples
    }

    /// Returns the names of sampled individuals, in VCF column order.
    pub fn individual_names(&self) -> &[String] {
        &self.individual_names
    }

    pub fn sequence_length(&self) -> u64 {
        self.sequence_length
    }

    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    /// Writes the request document as pretty-printed JSON.
    pub fn write_json<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        serde_json::to_writer_pretty(&mut *writer, &Document::from(self))?;
        writeln!(writer)
    }
}

#[derive(Serialize)]
struct Document<'a> {
    populations: Vec<PopulationEntry<'a>>,
    events: Vec<EventEntry<'a>>,
    samples: Vec<SampleEntry<'a>>,
    individual_names: &'a [String],
    sequence_length: u64,
    recombination_rate: f64,
    mutation_rate: f64,
    random_seed: u64,
}

#[derive(Serialize)]
struct PopulationEntry<'a> {
    name: &'a str,
    initial_size: f64,
    growth_rate: f64,
    default_sampling_time: Option<u64>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventEntry<'a> {
    Admixture {
        time: u64,
        derived: &'a str,
        ancestral: Vec<&'a str>,
        proportions: &'a [f64],
    },
    MassMigration {
        time: u64,
        source: &'a str,
        dest: &'a str,
        proportion: f64,
    },
    PopulationSplit {
        time: u64,
        derived: Vec<&'a str>,
        ancestral: &'a str,
    },
}

#[derive(Serialize)]
struct SampleEntry<'a> {
    population: &'a str,
    num_samples: usize,
    ploidy: usize,
}

impl<'a> From<&'a SimulationRequest> for Document<'a> {
    fn from(request: &'a SimulationRequest) -> Self {
        let demography = &request.demography;
        let name = |id: PopulationId| demography.population(id).name();

        let populations = demography
            .populations()
            .iter()
            .map(|population| PopulationEntry {
                name: population.name(),
                initial_size: population.initial_size(),
                growth_rate: population.growth_rate(),
                default_sampling_time: population.default_sampling_time(),
            })
            .collect();

        let events = demography
            .events()
            .iter()
            .map(|event| match event {
                Event::Admixture {
                    time,
                    derived,
                    ancestral,
                    proportions,
                } => EventEntry::Admixture {
                    time: *time,
                    derived: name(*derived),
                    ancestral: names(demography, ancestral),
                    proportions,
                },
                Event::MassMigration {
                    time,
                    source,
                    dest,
                    proportion,
                } => EventEntry::MassMigration {
                    time: *time,
                    source: name(*source),
                    dest: name(*dest),
                    proportion: *proportion,
                },
                Event::PopulationSplit {
                    time,
                    derived,
                    ancestral,
                } => EventEntry::PopulationSplit {
                    time: *time,
                    derived: names(demography, derived),
                    ancestral: name(*ancestral),
                },
            })
            .collect();

        let samples = request
            .samples
            .sets()
            .iter()
            .map(|set| SampleEntry {
                population: &set.population,
                num_samples: set.num_samples,
                ploidy: set.ploidy,
            })
            .collect();

        Self {
            populations,
            events,
            samples,
            individual_names: &request.individual_names,
            sequence_length: request.sequence_length,
            recombination_rate: request.recombination_rate,
            mutation_rate: request.mutation_rate,
            random_seed: request.random_seed,
        }
    }
}

fn names<'a>(demography: &'a Demography, ids: &[PopulationId]) -> Vec<&'a str> {
    ids.iter()
        .map(|&id| demography.population(id).name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{json, Value};

    use crate::{
        demography::Population,
        model::{self, Parameters, Variant},
    };

    fn small_request() -> SimulationRequest {
        let mut demography = Demography::new();
        demography
            .add_population(Population::new("A", 100.).with_default_sampling_time(5))
            .unwrap();
        demography
            .add_population(Population::new("B", 50.).with_growth_rate(0.01))
            .unwrap();
        demography.add_population(Population::new("C", 10.)).unwrap();
        demography.add_population_split(20, &["B"], "A").unwrap();
        demography
            .add_admixture(10, "C", &["A", "B"], &[0.25, 0.75])
            .unwrap();

        SimulationRequest::new(demography, SampleRequest::uniform(["A", "C"], 1, 2), 7).unwrap()
    }

    fn to_value(request: &SimulationRequest) -> Value {
        let mut buf = Vec::new();
        request.write_json(&mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_request_sorts_events() {
        let request = small_request();

        assert!(request.demography().is_sorted());
        assert_eq!(request.demography().events()[0].time(), 10);
    }

    #[test]
    fn test_request_unknown_sample_population() {
        let demography = Demography::new();

        assert_eq!(
            SimulationRequest::new(demography, SampleRequest::uniform(["X"], 1, 2), 1),
            Err(UnknownPopulationError(String::from("X")))
        );
    }

    #[test]
    fn test_document() {
        let value = to_value(&small_request());

        assert_eq!(
            value,
            json!({
                "populations": [
                    {"name": "A", "initial_size": 100.0, "growth_rate": 0.0, "default_sampling_time": 5},
                    {"name": "B", "initial_size": 50.0, "growth_rate": 0.01, "default_sampling_time": null},
                    {"name": "C", "initial_size": 10.0, "growth_rate": 0.0, "default_sampling_time": null},
                ],
                "events": [
                    {"type": "admixture", "time": 10, "derived": "C", "ancestral": ["A", "B"], "proportions": [0.25, 0.75]},
                    {"type": "population_split", "time": 20, "derived": ["B"], "ancestral": "A"},
                ],
                "samples": [
                    {"population": "A", "num_samples": 1, "ploidy": 2},
                    {"population": "C", "num_samples": 1, "ploidy": 2},
                ],
                "individual_names": ["A-A_1", "C-C_1"],
                "sequence_length": 3_000_000_000u64,
                "recombination_rate": 1e-8,
                "mutation_rate": 1.25e-8,
                "random_seed": 7,
            })
        );
    }

    #[test]
    fn test_hub_model_document() {
        let parameters = Parameters::new(Variant::B).unwrap();
        let demography = model::build(&parameters).unwrap();
        let request = SimulationRequest::new(demography, model::samples(), 42).unwrap();

        let value = to_value(&request);

        assert_eq!(value["populations"].as_array().unwrap().len(), 37);
        assert_eq!(value["events"].as_array().unwrap().len(), 33);
        assert_eq!(value["individual_names"].as_array().unwrap().len(), 290);
        assert_eq!(
            value["events"][0],
            json!({
                "type": "admixture",
                "time": 344,
                "derived": "WEA_BEA_EEA_a",
                "ancestral": ["WEA_BEA_a", "EEA"],
                "proportions": [0.9, 0.1],
            })
        );
        assert_eq!(
            value["events"]
                .as_array()
                .unwrap()
                .iter()
                .filter(|e| e["type"] == "mass_migration")
                .count(),
            7
        );
    }
}
