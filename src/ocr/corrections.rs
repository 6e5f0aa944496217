//! Fixed table of known OCR misreadings mapped to canonical ingredient names.

use regex::Regex;
use std::sync::LazyLock;

static CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)Glydern", "Glycerin"),
        (r"(?i)Centagaythrty", "Cetearyl"),
        (r"(?i)Tetraethyl Hexandate", "Ethylhexanoate"),
        (r"(?i)Propamediole", "Propanediol"),
        (
            r"(?i)Eumonium Polyarn On Dime Thyl Taurate",
            "Behentrimonium Methosulfate",
        ),
        (r"(?i)Polysoreate", "Polysorbate"),
        (r"(?i)Co Ceramide Np", "Ceramide NP"),
        (r"(?i)Coco-Betane", "Cocamidopropyl Betaine"),
        (r"(?i)Fanthenol", "Panthenol"),
        (r"(?i)\bAqua\b", "Water"),
        (r"(?i)\bEau\b", "Water"),
    ]
    .iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
    .collect()
});

/// Apply the correction table to a single ingredient name.
pub fn apply(name: &str) -> String {
    let mut corrected = name.to_string();
    for (pattern, replacement) in CORRECTIONS.iter() {
        corrected = pattern.replace_all(&corrected, *replacement).into_owned();
    }
    corrected
}
