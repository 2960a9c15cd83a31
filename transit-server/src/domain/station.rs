//! Station identity types.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::Coordinates;

/// Normalised identity of a station.
///
/// Stop names arrive from the route feed and the geocoder in slightly
/// different spellings ("Bến Thành", "Ben Thanh ", "BEN THANH"). The key is
/// the name with diacritics stripped, surrounding whitespace trimmed and
/// letters lowercased, so all of those collapse to `ben thanh`.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StationKey;
///
/// let a = StationKey::from_name("Bến Thành");
/// let b = StationKey::from_name("  ben thanh ");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "ben thanh");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationKey(String);

impl StationKey {
    /// Derive the key for a display name.
    pub fn from_name(name: &str) -> Self {
        let stripped: String = name.nfd().filter(|c| !is_combining_mark(*c)).collect();
        StationKey(stripped.trim().to_lowercase())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name normalised to nothing (blank input).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Combining diacritical marks block.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

impl fmt::Debug for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationKey({})", self.0)
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A geocoded station: display name plus position.
///
/// The key is always derived from the name, including when a station is
/// read back from the cache, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StationRecord", into = "StationRecord")]
pub struct Station {
    name: String,
    key: StationKey,
    coordinates: Coordinates,
}

impl Station {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        let name = name.into();
        let key = StationKey::from_name(&name);
        Self {
            name,
            key,
            coordinates,
        }
    }

    /// Display name as it appears on the route.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &StationKey {
        &self.key
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// Persisted form of a station (the key is recomputed on load).
#[derive(Serialize, Deserialize)]
struct StationRecord {
    name: String,
    coordinates: Coordinates,
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Self {
        Station::new(record.name, record.coordinates)
    }
}

impl From<Station> for StationRecord {
    fn from(station: Station) -> Self {
        StationRecord {
            name: station.name,
            coordinates: station.coordinates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_vietnamese_diacritics() {
        assert_eq!(StationKey::from_name("Bến Thành").as_str(), "ben thanh");
        assert_eq!(StationKey::from_name("Suối Tiên").as_str(), "suoi tien");
        assert_eq!(
            StationKey::from_name("Chợ Lớn").as_str(),
            StationKey::from_name("cho lon").as_str()
        );
    }

    #[test]
    fn keeps_letters_without_decomposition() {
        // đ has no canonical decomposition, so it survives normalisation
        assert_eq!(StationKey::from_name("Đầm Sen").as_str(), "đam sen");
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(StationKey::from_name("  BEN THANH\t").as_str(), "ben thanh");
    }

    #[test]
    fn blank_name_is_empty_key() {
        assert!(StationKey::from_name("   ").is_empty());
        assert!(!StationKey::from_name("A").is_empty());
    }

    #[test]
    fn debug_and_display() {
        let key = StationKey::from_name("Bến Thành");
        assert_eq!(format!("{key}"), "ben thanh");
        assert_eq!(format!("{key:?}"), "StationKey(ben thanh)");
    }

    #[test]
    fn station_key_follows_name() {
        let station = Station::new("Bến Thành", Coordinates::new(10.772, 106.698));
        assert_eq!(station.name(), "Bến Thành");
        assert_eq!(station.key(), &StationKey::from_name("ben thanh"));
    }

    #[test]
    fn deserialized_station_recomputes_key() {
        let json = r#"{"name":"Suối Tiên","coordinates":{"lat":10.87,"lon":106.80}}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.key().as_str(), "suoi tien");

        let back = serde_json::to_value(&station).unwrap();
        assert!(back.get("key").is_none());
        assert_eq!(back["name"], "Suối Tiên");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The key is a pure function of the name.
        #[test]
        fn key_is_deterministic(s in "\\PC{0,24}") {
            prop_assert_eq!(StationKey::from_name(&s), StationKey::from_name(&s));
        }

        /// Normalising an already-normalised key changes nothing.
        #[test]
        fn key_is_idempotent(s in "[a-zA-ZàáảãạăằắẳẵặâầấẩẫậèéẻẽẹêềếểễệìíỉĩịòóỏõọôồốổỗộơờớởỡợùúủũụưừứửữựỳýỷỹỵđĐ ]{0,24}") {
            let once = StationKey::from_name(&s);
            let twice = StationKey::from_name(once.as_str());
            prop_assert_eq!(once, twice);
        }

        /// Case and surrounding whitespace never affect the key.
        #[test]
        fn ascii_case_insensitive(s in "[A-Za-z ]{1,20}") {
            let padded = format!("  {}  ", s.to_uppercase());
            prop_assert_eq!(StationKey::from_name(&s), StationKey::from_name(&padded));
        }
    }
}
