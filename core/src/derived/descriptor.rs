use std::{fmt, str::FromStr};

/// An individual, as identified by family and individual ID.
///
/// Descriptors are read from lines of whitespace-separated tokens, where the first token is the
/// family ID and the second the individual ID. Further tokens, as found in `.fam` files, are
/// ignored but kept as part of the line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Descriptor {
    line: String,
    family_id: String,
    individual_id: String,
}

impl Descriptor {
    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }

    /// Returns the line the descriptor was read from, without line ending.
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl FromStr for Descriptor {
    type Err = ParseDescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\n', '\r']);
        let mut tokens = line.split_whitespace();

        match (tokens.next(), tokens.next()) {
            (Some(family_id), Some(individual_id)) => Ok(Self {
                line: line.to_string(),
                family_id: family_id.to_string(),
                individual_id: individual_id.to_string(),
            }),
            _ => Err(ParseDescriptorError(line.to_string())),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family_id, self.individual_id)
    }
}

/// An error associated with parsing a line without both family and individual ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseDescriptorError(String);

impl fmt::Display for ParseDescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse '{}' as family and individual ID",
            self.0
        )
    }
}

impl std::error::Error for ParseDescriptorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() -> Result<(), ParseDescriptorError> {
        let descriptor = Descriptor::from_str("FAM1 IND1\n")?;

        assert_eq!(descriptor.family_id(), "FAM1");
        assert_eq!(descriptor.individual_id(), "IND1");
        assert_eq!(descriptor.line(), "FAM1 IND1");

        Ok(())
    }

    #[test]
    fn test_parse_fam_line() -> Result<(), ParseDescriptorError> {
        let descriptor = Descriptor::from_str("POP1\tind2\t0\t0\t1\t-9")?;

        assert_eq!(descriptor.family_id(), "POP1");
        assert_eq!(descriptor.individual_id(), "ind2");
        assert_eq!(descriptor.line(), "POP1\tind2\t0\t0\t1\t-9");
        assert_eq!(descriptor.to_string(), "POP1 ind2");

        Ok(())
    }

    #[test]
    fn test_parse_descriptor_missing_individual() {
        assert_eq!(
            Descriptor::from_str("FAM1"),
            Err(ParseDescriptorError(String::from("FAM1")))
        );
        assert!(Descriptor::from_str("").is_err());
    }
}
