// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const PRINCIPAL_LEN: usize = 20;

/// A plain (unencrypted) identity on the host ledger: voters, the administrator and the election
/// itself are all principals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal([u8; PRINCIPAL_LEN]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrincipalParseError {
    #[error("principal must be 0x-prefixed hex")]
    MissingPrefix,
    #[error("invalid hex in principal: {0}")]
    InvalidHex(String),
    #[error("principal must be {PRINCIPAL_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

impl Principal {
    pub const fn new(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Self(bytes)
    }

    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; PRINCIPAL_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LEN] {
        &self.0
    }
}

impl From<[u8; PRINCIPAL_LEN]> for Principal {
    fn from(value: [u8; PRINCIPAL_LEN]) -> Self {
        Self(value)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({self})")
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s
            .strip_prefix("0x")
            .ok_or(PrincipalParseError::MissingPrefix)?;
        let bytes =
            hex::decode(stripped).map_err(|e| PrincipalParseError::InvalidHex(e.to_string()))?;
        let array: [u8; PRINCIPAL_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PrincipalParseError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
