use lazy_static::lazy_static;
use regex::Regex;

/// A place name students type, and where it points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationAlias {
    pub alias: &'static str,
    pub city: &'static str,
    pub area: Option<&'static str>,
}

const fn city(alias: &'static str, city: &'static str) -> LocationAlias {
    LocationAlias {
        alias,
        city,
        area: None,
    }
}

const fn area(alias: &'static str, city: &'static str, area: &'static str) -> LocationAlias {
    LocationAlias {
        alias,
        city,
        area: Some(area),
    }
}

pub const LOCATIONS: &[LocationAlias] = &[
    city("blr", "Bengaluru"),
    city("bangalore", "Bengaluru"),
    city("bengaluru", "Bengaluru"),
    area("koramangala", "Bengaluru", "Koramangala"),
    area("kormangala", "Bengaluru", "Koramangala"),
    area("hsr", "Bengaluru", "HSR Layout"),
    area("hsr layout", "Bengaluru", "HSR Layout"),
    area("indiranagar", "Bengaluru", "Indiranagar"),
    area("electronic city", "Bengaluru", "Electronic City"),
    city("bombay", "Mumbai"),
    city("mumbai", "Mumbai"),
    area("andheri", "Mumbai", "Andheri"),
    area("powai", "Mumbai", "Powai"),
    city("delhi", "Delhi"),
    city("new delhi", "Delhi"),
    area("north campus", "Delhi", "North Campus"),
    area("du north campus", "Delhi", "North Campus"),
    area("laxmi nagar", "Delhi", "Laxmi Nagar"),
    city("gurgaon", "Gurugram"),
    city("gurugram", "Gurugram"),
    city("noida", "Noida"),
    city("pune", "Pune"),
    area("kothrud", "Pune", "Kothrud"),
    city("kota", "Kota"),
    city("hyd", "Hyderabad"),
    city("hyderabad", "Hyderabad"),
    area("gachibowli", "Hyderabad", "Gachibowli"),
    city("madras", "Chennai"),
    city("chennai", "Chennai"),
    city("calcutta", "Kolkata"),
    city("kolkata", "Kolkata"),
];

lazy_static! {
    static ref PATTERNS: Vec<(Regex, &'static LocationAlias)> = LOCATIONS
        .iter()
        .map(|loc| {
            let pattern = format!(r"\b{}\b", regex::escape(loc.alias).replace(' ', r"\s+"));
            (Regex::new(&pattern).unwrap(), loc)
        })
        .collect();
}

/// Find the place named in `text` (already lower-cased). The longest
/// matching alias wins, so "du north campus" beats "delhi".
pub fn find_location(text: &str) -> Option<&'static LocationAlias> {
    PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, loc)| *loc)
        .max_by_key(|loc| loc.alias.len())
}

/// Exact alias lookup for a place name typed into a form field.
fn lookup(name: &str) -> Option<&'static LocationAlias> {
    let wanted = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LOCATIONS.iter().find(|loc| loc.alias == wanted)
}

/// Canonical city for `name`, e.g. "Bangalore" -> "Bengaluru".
pub fn canonical_city(name: &str) -> Option<&'static str> {
    lookup(name).map(|loc| loc.city)
}

/// Canonical area for `name`, e.g. "hsr" -> "HSR Layout".
pub fn canonical_area(name: &str) -> Option<&'static str> {
    lookup(name).and_then(|loc| loc.area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_aliases() {
        assert_eq!(find_location("pg in blr").unwrap().city, "Bengaluru");
        assert_eq!(find_location("rooms in bombay").unwrap().city, "Mumbai");
        assert_eq!(find_location("madras hostels").unwrap().city, "Chennai");
        assert!(find_location("somewhere nice").is_none());
    }

    #[test]
    fn test_area_alias_sets_city() {
        let loc = find_location("something near kormangala").unwrap();
        assert_eq!(loc.city, "Bengaluru");
        assert_eq!(loc.area, Some("Koramangala"));
    }

    #[test]
    fn test_longest_alias_wins() {
        let loc = find_location("girls pg near du north campus delhi").unwrap();
        assert_eq!(loc.area, Some("North Campus"));
        let loc = find_location("flat in new  delhi").unwrap();
        assert_eq!(loc.alias, "new delhi");
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(canonical_city("Bangalore"), Some("Bengaluru"));
        assert_eq!(canonical_city("  New   Delhi "), Some("Delhi"));
        assert_eq!(canonical_city("GURGAON"), Some("Gurugram"));
        assert_eq!(canonical_city("Mysuru"), None);
        assert_eq!(canonical_area("hsr"), Some("HSR Layout"));
        assert_eq!(canonical_area("Kormangala"), Some("Koramangala"));
        assert_eq!(canonical_area("Pune"), None);
    }

    #[test]
    fn test_word_boundaries() {
        // "kota" must not match inside "dakota", nor "hyd" inside "hydrant"
        assert!(find_location("north dakota").is_none());
        assert!(find_location("near the hydrant").is_none());
    }
}
