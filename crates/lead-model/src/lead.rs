//! Lead records as served and accepted by the lead API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::fields;
use crate::tracking::TrackingParams;

/// Server-assigned lead identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub u64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LeadId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ModelError::InvalidLeadId(s.to_string()))
    }
}

/// Full lead record (`GET /leads/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub cargo: String,
    #[serde(default, rename = "dataNascimento")]
    pub data_nascimento: String,
    #[serde(default)]
    pub mensagem: String,
    #[serde(flatten)]
    pub tracking: TrackingParams,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

impl Lead {
    /// The writable part of this record.
    pub fn fields(&self) -> LeadFields {
        LeadFields {
            nome: self.nome.clone(),
            email: self.email.clone(),
            telefone: self.telefone.clone(),
            cargo: self.cargo.clone(),
            data_nascimento: self.data_nascimento.clone(),
            mensagem: self.mensagem.clone(),
            tracking: self.tracking.clone(),
        }
    }
}

/// Dashboard row (`GET /leads`).
///
/// The list endpoint may send full records; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: LeadId,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

/// Payload for `POST /leads` and `PUT /leads/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFields {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cargo: String,
    #[serde(rename = "dataNascimento")]
    pub data_nascimento: String,
    pub mensagem: String,
    #[serde(flatten)]
    pub tracking: TrackingParams,
}

impl LeadFields {
    /// Build from a field lookup keyed by wire name.
    ///
    /// Missing contact fields become empty strings; missing or empty
    /// tracking fields stay absent.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let text = |name: &str| lookup(name).unwrap_or_default().to_string();
        let mut tracking = TrackingParams::default();
        for name in fields::TRACKING_FIELDS {
            if let Some(value) = lookup(name) {
                tracking.set(name, value);
            }
        }
        Self {
            nome: text(fields::NOME),
            email: text(fields::EMAIL),
            telefone: text(fields::TELEFONE),
            cargo: text(fields::CARGO),
            data_nascimento: text(fields::DATA_NASCIMENTO),
            mensagem: text(fields::MENSAGEM),
            tracking,
        }
    }

    /// Flatten into `(wire name, value)` pairs, contact fields first.
    ///
    /// Absent tracking fields are skipped.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (fields::NOME, self.nome.clone()),
            (fields::EMAIL, self.email.clone()),
            (fields::TELEFONE, self.telefone.clone()),
            (fields::CARGO, self.cargo.clone()),
            (fields::DATA_NASCIMENTO, self.data_nascimento.clone()),
            (fields::MENSAGEM, self.mensagem.clone()),
        ];
        pairs.extend(
            self.tracking
                .present()
                .map(|(name, value)| (name, value.to_string())),
        );
        pairs
    }
}
