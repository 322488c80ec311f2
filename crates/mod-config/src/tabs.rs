//! Country tabs for the city picker.

use isocountry::CountryCode;
use maploader_protocol::MapManifest;
use maploader_protocol::constants::DOMESTIC_COUNTRIES;

use crate::document::CountryTab;

/// Offset from an ASCII capital letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 0x1F1E6 - 'A' as u32;

/// Flag glyph for an alpha-2 country code, e.g. `PT` → 🇵🇹.
///
/// Returns `None` unless `code` is exactly two ASCII letters.
pub fn flag_emoji(code: &str) -> Option<String> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.chars()
        .map(|c| char::from_u32(c.to_ascii_uppercase() as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

/// English short name for an alpha-2 country code.
pub fn country_name(code: &str) -> Option<&'static str> {
    CountryCode::for_alpha2(&code.to_ascii_uppercase())
        .ok()
        .map(|c| c.name())
}

/// Groups places by country, in order of first appearance.
///
/// Places without a country, or in a domestic country, get no tab.
pub fn generate_tabs(places: &[MapManifest]) -> Vec<CountryTab> {
    let mut tabs: Vec<CountryTab> = Vec::new();

    for place in places {
        let Some(country) = place.country.as_deref() else {
            continue;
        };
        let id = country.to_ascii_uppercase();
        if DOMESTIC_COUNTRIES.contains(&id.as_str()) {
            continue;
        }

        if let Some(tab) = tabs.iter_mut().find(|t| t.id == id) {
            tab.city_codes.push(place.code.clone());
            continue;
        }

        tabs.push(CountryTab {
            label: country_name(&id).map_or_else(|| id.clone(), str::to_string),
            emoji: flag_emoji(&id).unwrap_or_default(),
            city_codes: vec![place.code.clone()],
            id,
        });
    }

    tabs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(code: &str, country: Option<&str>) -> MapManifest {
        let mut value = serde_json::json!({
            "name": code,
            "creator": "tester",
            "version": "1",
            "description": "",
            "population": 1,
            "code": code,
            "initialViewState": null
        });
        if let Some(country) = country {
            value["country"] = country.into();
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flag_uses_regional_indicators() {
        assert_eq!(flag_emoji("PT").as_deref(), Some("\u{1F1F5}\u{1F1F9}"));
        assert_eq!(flag_emoji("de").as_deref(), Some("\u{1F1E9}\u{1F1EA}"));
        assert_eq!(flag_emoji("PRT"), None);
        assert_eq!(flag_emoji("P1"), None);
    }

    #[test]
    fn country_names_are_english() {
        assert_eq!(country_name("PT"), Some("Portugal"));
        assert_eq!(country_name("fr"), Some("France"));
        assert_eq!(country_name("XX"), None);
    }

    #[test]
    fn groups_by_country_in_first_seen_order() {
        let places = vec![
            place("LIS", Some("PT")),
            place("PAR", Some("FR")),
            place("OPO", Some("PT")),
        ];
        let tabs = generate_tabs(&places);

        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].id, "PT");
        assert_eq!(tabs[0].label, "Portugal");
        assert_eq!(tabs[0].city_codes, vec!["LIS", "OPO"]);
        assert_eq!(tabs[1].id, "FR");
        assert_eq!(tabs[1].city_codes, vec!["PAR"]);
    }

    #[test]
    fn domestic_and_countryless_places_get_no_tab() {
        let places = vec![
            place("NYC", Some("US")),
            place("LDN", Some("gb")),
            place("XYZ", None),
        ];
        assert!(generate_tabs(&places).is_empty());
    }

    #[test]
    fn unknown_country_uses_code_as_label() {
        let tabs = generate_tabs(&[place("ZZZ", Some("XK"))]);
        assert_eq!(tabs.len(), 1);
        assert!(!tabs[0].label.is_empty());
        assert_eq!(tabs[0].emoji, "\u{1F1FD}\u{1F1F0}");
    }
}
