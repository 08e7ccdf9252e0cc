use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::ChatFilters;
use super::locations::find_location;
use crate::models::{Amenity, Gender, PropertyType};

/// An amount: optional currency marker, digits with optional thousands
/// separators and decimals, optional `k` suffix. Two capture groups.
const AMOUNT: &str = r"(?:(?:rs\.?|inr|₹)\s*)?(\d+(?:,\d+)*(?:\.\d+)?)\s*(k)?\b";

lazy_static! {
    static ref RANGE_PATTERNS: Vec<Regex> = [
        format!(r"\bbetween\s+{AMOUNT}\s*and\s*{AMOUNT}"),
        format!(r"(?:\bfrom\s+)?{AMOUNT}\s*(?:-|–|\bto\b)\s*{AMOUNT}"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref MAX_PATTERN: Regex = Regex::new(&format!(
        r"\b(?:under|below|less\s+than|within|upto|up\s+to|max(?:imum)?|budget(?:\s+of)?)\s*{AMOUNT}"
    ))
    .unwrap();
    static ref MIN_PATTERN: Regex = Regex::new(&format!(
        r"\b(?:above|over|more\s+than|min(?:imum)?|at\s*least|starting(?:\s+from)?)\s*{AMOUNT}"
    ))
    .unwrap();
    static ref LONE_PATTERNS: Vec<Regex> = [
        format!(r"\b(?:rent|price|budget)\s*(?:is|of|:)?\s*{AMOUNT}"),
        format!(r"{AMOUNT}\s*(?:per\s+month|/\s*month|/\s*mo\b|\bpm\b|a\s+month)"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Bare range ends below this are counts, not rupees.
const MIN_RANGE_AMOUNT: u32 = 100;

const GENDER_WORDS: &[(&str, Gender)] = &[
    (r"boys?|male|men|gents", Gender::Boys),
    (r"girls?|female|women|ladies", Gender::Girls),
    (r"co-?ed|co-?living|unisex|mixed", Gender::CoLiving),
];

const TYPE_WORDS: &[(&str, PropertyType)] = &[
    (r"pg|paying\s+guest", PropertyType::Pg),
    (r"hostels?", PropertyType::Hostel),
    (r"flats?|apartments?|\d?\s*bhk", PropertyType::Flat),
];

const AMENITY_WORDS: &[(&str, Amenity)] = &[
    (r"wifi|wi-fi|internet", Amenity::Wifi),
    (r"ac|a/c|air[\s-]conditioned", Amenity::Ac),
    (r"food|meals?|mess|tiffin", Amenity::Meals),
    (r"laundry|washing", Amenity::Laundry),
    (r"parking", Amenity::Parking),
    (r"gym", Amenity::Gym),
    (r"security|cctv", Amenity::Security),
    (r"power\s+backup|inverter", Amenity::PowerBackup),
    (r"housekeeping|cleaning", Amenity::Housekeeping),
];

fn word_table<T: Copy>(table: &[(&str, T)]) -> Vec<(Regex, T)> {
    table
        .iter()
        .map(|(words, value)| (Regex::new(&format!(r"\b(?:{})\b", words)).unwrap(), *value))
        .collect()
}

lazy_static! {
    static ref GENDERS: Vec<(Regex, Gender)> = word_table(GENDER_WORDS);
    static ref TYPES: Vec<(Regex, PropertyType)> = word_table(TYPE_WORDS);
    static ref AMENITIES: Vec<(Regex, Amenity)> = word_table(AMENITY_WORDS);
}

/// Turn a free-text message into search filters.
pub fn extract_filters(message: &str) -> ChatFilters {
    let text = message.to_lowercase();
    let (min_rent, max_rent) = extract_price(&text);
    let location = find_location(&text);

    let mut amenities: Vec<Amenity> = AMENITIES
        .iter()
        .filter(|(re, _)| re.is_match(&text))
        .map(|(_, amenity)| *amenity)
        .collect();
    amenities.sort();
    amenities.dedup();

    ChatFilters {
        city: location.map(|l| l.city.to_string()),
        area: location.and_then(|l| l.area).map(str::to_string),
        min_rent,
        max_rent,
        gender: first_match(&GENDERS, &text),
        property_type: first_match(&TYPES, &text),
        amenities,
    }
}

/// The entry whose words appear earliest in `text`.
fn first_match<T: Copy>(table: &[(Regex, T)], text: &str) -> Option<T> {
    table
        .iter()
        .filter_map(|(re, value)| re.find(text).map(|m| (m.start(), *value)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, value)| value)
}

/// Rent bounds mentioned in `text`, as `(min, max)`.
///
/// Explicit ranges win over upper bounds, upper bounds over lower bounds, and
/// a bare amount next to "rent" or "per month" is read as a budget ceiling.
pub fn extract_price(text: &str) -> (Option<u32>, Option<u32>) {
    for re in RANGE_PATTERNS.iter() {
        if let Some((low, high)) = re.captures_iter(text).find_map(|caps| range_bounds(&caps)) {
            return (Some(low.min(high)), Some(low.max(high)));
        }
    }
    if let Some(max) = first_amount(&MAX_PATTERN, text) {
        return (None, Some(max));
    }
    if let Some(min) = first_amount(&MIN_PATTERN, text) {
        return (Some(min), None);
    }
    let lone = LONE_PATTERNS.iter().find_map(|re| first_amount(re, text));
    (None, lone)
}

fn first_amount(re: &Regex, text: &str) -> Option<u32> {
    let caps = re.captures(text)?;
    parse_amount(caps.get(1)?.as_str(), caps.get(2).is_some())
}

fn range_bounds(caps: &Captures) -> Option<(u32, u32)> {
    let low_kilo = caps.get(2).is_some();
    let high_kilo = caps.get(4).is_some();
    let high = parse_amount(caps.get(3)?.as_str(), high_kilo)?;
    // "8-12k" means 8k to 12k
    let low_raw = caps.get(1)?.as_str();
    let low = match parse_amount(low_raw, low_kilo)? {
        small if !low_kilo && high_kilo && small < 1000 => parse_amount(low_raw, true)?,
        other => other,
    };
    // "2 to 3 sharing" is a room size, not a rent
    if !low_kilo && !high_kilo && high < MIN_RANGE_AMOUNT {
        return None;
    }
    Some((low, high))
}

/// Parse `8,500`, `8.5` with `kilo`, and so on, into whole rupees.
pub fn parse_amount(digits: &str, kilo: bool) -> Option<u32> {
    let value: f64 = digits.replace(',', "").parse().ok()?;
    let value = if kilo { value * 1000.0 } else { value };
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.round() as u32)
}
