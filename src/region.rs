//! Region classification and district extraction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// District reported when an address names none of the known districts.
pub const UNKNOWN_DISTRICT: &str = "UNKNOWN";

/// Coarse geographic area of a pickup, used to restrict eligible vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    AreaA,
    AreaB,
    Other,
}

impl Region {
    /// Whether a vehicle with the given restriction flag may carry a pickup
    /// from this region.
    ///
    /// Area A is served only by restricted vehicles, and restricted vehicles
    /// never cross over to area B.
    pub fn admits(self, restricted_vehicle: bool) -> bool {
        match self {
            Region::AreaA => restricted_vehicle,
            Region::AreaB => !restricted_vehicle,
            Region::Other => true,
        }
    }
}

/// Static district → region lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    area_a: HashSet<String>,
    area_b: HashSet<String>,
}

impl RegionTable {
    pub fn new<A, B>(area_a: A, area_b: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Self {
            area_a: area_a.into_iter().map(|d| fold(d.as_ref())).collect(),
            area_b: area_b.into_iter().map(|d| fold(d.as_ref())).collect(),
        }
    }

    /// Classify a district name. Matching ignores case and diacritics;
    /// anything unknown is [`Region::Other`].
    pub fn classify(&self, district: &str) -> Region {
        let key = fold(district);
        if self.area_a.contains(&key) {
            Region::AreaA
        } else if self.area_b.contains(&key) {
            Region::AreaB
        } else {
            Region::Other
        }
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new(
            ["Tekirova", "Çamyuva", "Kemer", "Göynük", "Beldibi"],
            [
                "Side",
                "Sorgun",
                "Manavgat",
                "Kumköy",
                "Evrenseki",
                "Çolaklı",
                "Kızılot",
                "Kızılağaç",
                "Okurcalar",
            ],
        )
    }
}

const DEFAULT_DISTRICTS: &[&str] = &[
    "Tekirova",
    "Çamyuva",
    "Kemer",
    "Göynük",
    "Beldibi",
    "Konyaaltı",
    "Kaleiçi",
    "Muratpaşa",
    "Lara",
    "Kundu",
    "Aksu",
    "Kadriye",
    "Belek",
    "Boğazkent",
    "Serik",
    "Gündoğdu",
    "Çolaklı",
    "Evrenseki",
    "Kumköy",
    "Side",
    "Sorgun",
    "Manavgat",
    "Kızılot",
    "Kızılağaç",
    "Okurcalar",
    "İncekum",
    "Avsallar",
    "Türkler",
    "Payallar",
    "Konaklı",
    "Alanya",
    "Oba",
    "Tosmur",
    "Kestel",
    "Mahmutlar",
];

/// Finds the first known district named in a free-text pickup address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictExtractor {
    districts: Vec<String>,
}

impl DistrictExtractor {
    pub fn new<I>(districts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            districts: districts.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the first listed district that appears as a whole word in
    /// `address`, or [`UNKNOWN_DISTRICT`].
    pub fn extract(&self, address: &str) -> &str {
        let haystack = fold(address);
        if haystack.is_empty() {
            return UNKNOWN_DISTRICT;
        }

        for district in &self.districts {
            if contains_word(&haystack, &fold(district)) {
                return district;
            }
        }

        debug!(address, "no district matched pickup address");
        UNKNOWN_DISTRICT
    }
}

impl Default for DistrictExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRICTS.iter().copied())
    }
}

/// Lowercase and strip the diacritics found in Turkish place names.
pub(crate) fn fold(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            'ç' | 'Ç' => 'c',
            'ğ' | 'Ğ' => 'g',
            'ı' | 'İ' | 'I' => 'i',
            'ö' | 'Ö' => 'o',
            'ş' | 'Ş' => 's',
            'ü' | 'Ü' => 'u',
            'â' | 'Â' => 'a',
            'î' | 'Î' => 'i',
            'û' | 'Û' => 'u',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RegionTable {
        RegionTable::new(["Area-A-district"], ["Area-B-district"])
    }

    #[test]
    fn classifies_known_districts() {
        let table = table();
        assert_eq!(table.classify("Area-A-district"), Region::AreaA);
        assert_eq!(table.classify("Area-B-district"), Region::AreaB);
    }

    #[test]
    fn unknown_district_is_other_every_time() {
        let table = table();
        for _ in 0..3 {
            assert_eq!(table.classify("Nowhere"), Region::Other);
        }
        assert_eq!(table.classify(""), Region::Other);
    }

    #[test]
    fn classification_ignores_case_and_accents() {
        let table = RegionTable::default();
        assert_eq!(table.classify("KEMER"), Region::AreaA);
        assert_eq!(table.classify("camyuva"), Region::AreaA);
        assert_eq!(table.classify(" Kumkoy "), Region::AreaB);
        assert_eq!(table.classify("Alanya"), Region::Other);
    }

    #[test]
    fn admits_follows_vehicle_restriction() {
        assert!(Region::AreaA.admits(true));
        assert!(!Region::AreaA.admits(false));
        assert!(Region::AreaB.admits(false));
        assert!(!Region::AreaB.admits(true));
        assert!(Region::Other.admits(true));
        assert!(Region::Other.admits(false));
    }

    #[test]
    fn extracts_district_from_address() {
        let extractor = DistrictExtractor::default();
        assert_eq!(
            extractor.extract("Kiriş, Sahil Cd. No:15, 07980 Kemer/Antalya, Türkiye"),
            "Kemer"
        );
        assert_eq!(extractor.extract("Hotel Kızılot Beach"), "Kızılot");
        assert_eq!(extractor.extract("kizilot beach resort"), "Kızılot");
    }

    #[test]
    fn extraction_matches_whole_words_only() {
        let extractor = DistrictExtractor::default();
        assert_eq!(extractor.extract("Seaside Resort, Lakeshore"), UNKNOWN_DISTRICT);
        assert_eq!(extractor.extract("Side Star Resort, Side"), "Side");
    }

    #[test]
    fn blank_address_is_unknown() {
        let extractor = DistrictExtractor::default();
        assert_eq!(extractor.extract("   "), UNKNOWN_DISTRICT);
    }
}
