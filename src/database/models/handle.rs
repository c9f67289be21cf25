//! Account-handle model and its composite key.
//!
//! A handle is one external game-account binding, identified by the
//! `(region, realm, profile)` triple. The triple is globally unique across
//! owners; each owner has at most one handle marked active.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Game regions the arcade API serves. Region 4 was never deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Us,
    Eu,
    Kr,
    Cn,
}

impl Region {
    /// Numeric region id used by the upstream API and the store.
    pub fn id(self) -> u8 {
        match self {
            Self::Us => 1,
            Self::Eu => 2,
            Self::Kr => 3,
            Self::Cn => 5,
        }
    }

    /// Short display tag, e.g. `[EU]`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Us => "[US]",
            Self::Eu => "[EU]",
            Self::Kr => "[KR]",
            Self::Cn => "[CN]",
        }
    }
}

impl TryFrom<u8> for Region {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Self::Us),
            2 => Ok(Self::Eu),
            3 => Ok(Self::Kr),
            5 => Ok(Self::Cn),
            other => Err(Error::InvalidHandle(format!("unknown region id {other}"))),
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    /// Parse a region code (`US`, `EU`, `KR`, `CN`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "EU" => Ok(Self::Eu),
            "KR" => Ok(Self::Kr),
            "CN" => Ok(Self::Cn),
            other => Err(Error::InvalidHandle(format!("unknown region code {other:?}"))),
        }
    }
}

// Stored and transmitted as the numeric id.
impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.id())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u8::deserialize(deserializer)?;
        Region::try_from(id).map_err(serde::de::Error::custom)
    }
}

/// Composite natural key of an external game account.
///
/// Text form is `R-S2-realm-profile`, e.g. `5-S2-1-1234567`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    pub region: Region,
    pub realm: u8,
    pub profile: i64,
}

impl ProfileKey {
    /// Build a key from already-parsed components, validating ranges.
    pub fn new(region: Region, realm: u8, profile: i64) -> Result<Self, Error> {
        if !matches!(realm, 1 | 2) {
            return Err(Error::InvalidHandle(format!("realm must be 1 or 2, got {realm}")));
        }
        if profile <= 0 {
            return Err(Error::InvalidHandle(format!("profile id must be positive, got {profile}")));
        }
        Ok(Self { region, realm, profile })
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-S2-{}-{}", self.region.id(), self.realm, self.profile)
    }
}

impl FromStr for ProfileKey {
    type Err = Error;

    /// Parse the `R-S2-realm-profile` handle text. The `S2` marker is
    /// case-insensitive, everything else must match exactly.
    fn from_str(s: &str) -> Result<Self, Error> {
        let malformed = || Error::InvalidHandle(format!("expected R-S2-realm-profile, got {s:?}"));

        let mut parts = s.split('-');
        let region = parts.next().ok_or_else(malformed)?;
        let marker = parts.next().ok_or_else(malformed)?;
        let realm = parts.next().ok_or_else(malformed)?;
        let profile = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() || !marker.eq_ignore_ascii_case("s2") {
            return Err(malformed());
        }

        let region: u8 = region.parse().map_err(|_| malformed())?;
        let realm: u8 = realm.parse().map_err(|_| malformed())?;
        let profile: i64 = profile.parse().map_err(|_| malformed())?;

        Self::new(Region::try_from(region)?, realm, profile)
    }
}

/// One external game-account binding owned by a chat-platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Chat-platform user id owning this binding.
    pub owner_id: String,
    pub region: Region,
    pub realm: u8,
    pub profile: i64,
    /// Exactly one handle per owner carries this flag while the owner
    /// has any handles at all.
    pub active: bool,
    /// Unix timestamp (seconds). Immutable; defines the list order.
    pub created_at: i64,
}

impl Handle {
    /// Create a fresh binding stamped with the current time.
    pub fn new(owner_id: impl Into<String>, key: ProfileKey, active: bool) -> Self {
        Self {
            owner_id: owner_id.into(),
            region: key.region,
            realm: key.realm,
            profile: key.profile,
            active,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// The account triple of this binding.
    pub fn key(&self) -> ProfileKey {
        ProfileKey {
            region: self.region,
            realm: self.realm,
            profile: self.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_handle_text() {
        let key: ProfileKey = "5-S2-1-1234567".parse().unwrap();
        assert_eq!(key.region, Region::Cn);
        assert_eq!(key.realm, 1);
        assert_eq!(key.profile, 1234567);
        assert_eq!(key.to_string(), "5-S2-1-1234567");
    }

    #[test]
    fn marker_is_case_insensitive() {
        let key: ProfileKey = "2-s2-2-42".parse().unwrap();
        assert_eq!(key.region, Region::Eu);
        assert_eq!(key.realm, 2);
    }

    #[test]
    fn rejects_bad_handle_text() {
        for input in [
            "4-S2-1-100",  // region 4 never existed
            "1-S2-3-100",  // realm out of range
            "1-S2-1-0",    // profile must be positive
            "1-S3-1-100",  // wrong marker
            "1-S2-1",      // missing component
            "1-S2-1-2-3",  // trailing component
            "one-S2-1-2",  // non-numeric
        ] {
            assert!(input.parse::<ProfileKey>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn region_codes_round_trip() {
        for (code, region) in [("us", Region::Us), ("EU", Region::Eu), ("kr", Region::Kr), ("CN", Region::Cn)] {
            assert_eq!(code.parse::<Region>().unwrap(), region);
            assert_eq!(Region::try_from(region.id()).unwrap(), region);
        }
        assert!("SEA".parse::<Region>().is_err());
        assert!(Region::try_from(4).is_err());
    }
}
