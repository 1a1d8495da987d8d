//! Address-to-table-index resolution.

use serde::{Deserialize, Serialize};

/// One row of the location table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Row/column in the distance table.
    pub index: usize,
    /// Display name, e.g. the business at the address.
    pub name: String,
    /// Street text addresses are matched against.
    pub key: String,
}

impl Location {
    pub fn new(index: usize, name: &str, key: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            key: key.to_string(),
        }
    }
}

/// Lowercases, trims and collapses runs of whitespace.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Removes suite markers such as `#104` or `# 12`.
pub(crate) fn strip_suite(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '#' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let digits_start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let ends_word = j == chars.len() || !chars[j].is_alphanumeric();
            if j > digits_start && ends_word {
                i = j;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    normalize(&out)
}

/// The finite set of named places the distance table covers.
///
/// # Examples
///
/// ```
/// use parcel_routing::distance::{Location, LocationIndex};
///
/// let index = LocationIndex::new(vec![
///     Location::new(0, "Hub", "4001 South 700 East"),
///     Location::new(1, "Park", "1060 Dalton Ave S"),
/// ]);
/// assert_eq!(index.resolve("1060  dalton ave s"), Some(1));
/// assert_eq!(index.resolve("1060 Dalton Ave S #12"), Some(1));
/// assert_eq!(index.resolve("nowhere"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    locations: Vec<Location>,
    keys: Vec<String>,
}

impl LocationIndex {
    pub fn new(locations: Vec<Location>) -> Self {
        let keys = locations.iter().map(|l| normalize(&l.key)).collect();
        Self { locations, keys }
    }

    /// Maps free-form street text to a table index.
    ///
    /// Tries an exact normalized match (with and without suite markers)
    /// first, then a substring match in either direction, both in table
    /// order.
    pub fn resolve(&self, address: &str) -> Option<usize> {
        let target = normalize(address);
        let bare = strip_suite(address);
        if target.is_empty() {
            return None;
        }

        let exact = self
            .keys
            .iter()
            .position(|k| *k == target || *k == bare);
        let pos = exact.or_else(|| {
            self.keys.iter().position(|k| {
                !k.is_empty()
                    && (k.contains(&target)
                        || target.contains(k.as_str())
                        || (!bare.is_empty() && (k.contains(&bare) || bare.contains(k.as_str()))))
            })
        })?;
        Some(self.locations[pos].index)
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.iter().find(|l| l.index == index)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> LocationIndex {
        LocationIndex::new(vec![
            Location::new(0, "Western Governors University", "4001 South 700 East"),
            Location::new(1, "International Peace Gardens", "1060 Dalton Ave S"),
            Location::new(2, "Sugar House Park", "1330 2100 S"),
            Location::new(3, "Taylorsville-Bennion Heritage City Gov Off", "1488 4800 S"),
        ])
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  1060   Dalton\tAve S "), "1060 dalton ave s");
    }

    #[test]
    fn test_strip_suite() {
        assert_eq!(strip_suite("233 Canyon Rd #104"), "233 canyon rd");
        assert_eq!(strip_suite("233 Canyon Rd # 7 rear"), "233 canyon rd rear");
        assert_eq!(strip_suite("#1 Fan"), "fan");
        assert_eq!(strip_suite("Unit #A2"), "unit #a2");
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(index().resolve("1330 2100 S"), Some(2));
        assert_eq!(index().resolve("1330 2100 s"), Some(2));
    }

    #[test]
    fn test_suite_stripped_match() {
        assert_eq!(index().resolve("1488 4800 S #12"), Some(3));
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(index().resolve("1060 Dalton Ave S, Salt Lake City"), Some(1));
        assert_eq!(index().resolve("Dalton Ave"), Some(1));
    }

    #[test]
    fn test_exact_beats_earlier_substring() {
        let idx = LocationIndex::new(vec![
            Location::new(0, "Hub", "100 Main St North"),
            Location::new(1, "Shop", "100 Main St"),
        ]);
        assert_eq!(idx.resolve("100 Main St"), Some(1));
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(index().resolve("999 Imaginary Blvd"), None);
        assert_eq!(index().resolve("   "), None);
    }

    #[test]
    fn test_get_by_index() {
        let idx = index();
        assert_eq!(idx.get(2).map(|l| l.name.as_str()), Some("Sugar House Park"));
        assert!(idx.get(9).is_none());
        assert_eq!(idx.len(), 4);
    }
}
