use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Compute-class classification of a block producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capacity {
    Mobile,
    Desktop,
    Server,
}

impl Capacity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capacity::Mobile => "MOBILE",
            Capacity::Desktop => "DESKTOP",
            Capacity::Server => "SERVER",
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Capacity {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MOBILE" => Ok(Capacity::Mobile),
            "DESKTOP" => Ok(Capacity::Desktop),
            "SERVER" => Ok(Capacity::Server),
            _ => Err(()),
        }
    }
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Capacity::from_str(&s).map_err(|_| DeError::custom(format!("unknown capacity: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("mobile".parse::<Capacity>().unwrap(), Capacity::Mobile);
        assert_eq!("Desktop".parse::<Capacity>().unwrap(), Capacity::Desktop);
        assert_eq!("SERVER".parse::<Capacity>().unwrap(), Capacity::Server);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("toaster".parse::<Capacity>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Capacity::Mobile).unwrap(), "\"MOBILE\"");
    }
}
