use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MergeError, Result};
use crate::zone::ZoneNormalizer;

/// Zone that merged records are normalized into
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSetting {
    /// The process's local zone
    #[default]
    Local,
    /// A fixed abbreviation such as `UTC`
    Named(String),
}

impl ZoneSetting {
    pub fn normalizer(&self) -> Result<ZoneNormalizer> {
        match self {
            Self::Local => Ok(ZoneNormalizer::local()),
            Self::Named(abbrev) => ZoneNormalizer::named(abbrev),
        }
    }
}

impl FromStr for ZoneSetting {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        // reject unknown names up front
        ZoneNormalizer::named(s)?;
        Ok(Self::Named(s.to_ascii_uppercase()))
    }
}

impl fmt::Display for ZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(abbrev) => f.write_str(abbrev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("local".parse::<ZoneSetting>().unwrap(), ZoneSetting::Local);
        assert_eq!("LOCAL".parse::<ZoneSetting>().unwrap(), ZoneSetting::Local);
        assert_eq!(
            "utc".parse::<ZoneSetting>().unwrap(),
            ZoneSetting::Named("UTC".into())
        );
        assert!("nowhere".parse::<ZoneSetting>().is_err());
    }

    #[test]
    fn test_named_setting_builds_normalizer() {
        let zones = ZoneSetting::Named("PST".into()).normalizer().unwrap();
        assert_eq!(zones, ZoneNormalizer::named("PST").unwrap());
    }

    #[test]
    fn test_serde_shape() {
        let local: ZoneSetting = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(local, ZoneSetting::Local);
        let named: ZoneSetting = serde_json::from_str("{\"named\":\"UTC\"}").unwrap();
        assert_eq!(named, ZoneSetting::Named("UTC".into()));
    }
}
