use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderParseError(pub String);

impl Display for GenderParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown gender tag '{}'", self.0)
    }
}

impl std::error::Error for GenderParseError {}

impl FromStr for Gender {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" => Ok(Gender::M),
            "F" => Ok(Gender::F),
            other => Err(GenderParseError(other.to_string())),
        }
    }
}

/// Reference data about a user, owned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub username: String,
    pub gender: Gender,
}

impl Participant {
    pub fn new(id: Uuid, username: impl Into<String>, gender: Gender) -> Self {
        Participant {
            id,
            username: username.into(),
            gender,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCounts {
    #[serde(rename = "M")]
    pub m: usize,
    #[serde(rename = "F")]
    pub f: usize,
}

impl GenderCounts {
    pub fn get(&self, gender: Gender) -> usize {
        match gender {
            Gender::M => self.m,
            Gender::F => self.f,
        }
    }

    pub fn add(&mut self, gender: Gender) {
        match gender {
            Gender::M => self.m += 1,
            Gender::F => self.f += 1,
        }
    }

    pub fn remove(&mut self, gender: Gender) {
        match gender {
            Gender::M => self.m -= 1,
            Gender::F => self.f -= 1,
        }
    }

    pub fn total(&self) -> usize {
        self.m + self.f
    }
}

impl<'a> FromIterator<&'a Gender> for GenderCounts {
    fn from_iter<T: IntoIterator<Item = &'a Gender>>(iter: T) -> Self {
        let mut counts = GenderCounts::default();
        for gender in iter {
            counts.add(*gender);
        }
        counts
    }
}
