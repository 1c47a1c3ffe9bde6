const LANGUAGE_LABELS: &[(&str, &str)] = &[
    ("fr", "Français"),
    ("en", "Anglais"),
    ("es", "Espagnol"),
    ("pt", "Portugais"),
    ("de", "Allemand"),
    ("it", "Italien"),
    ("nl", "Néerlandais"),
    ("pl", "Polonais"),
    ("ru", "Russe"),
    ("zh", "Chinois"),
    ("hi", "Hindi"),
    ("ta", "Tamoul"),
    ("ml", "Malayalam"),
    ("he", "Hébreu"),
    ("ja", "Japonais"),
    ("id", "Indonésien"),
    ("bg", "Bulgare"),
    ("da", "Danois"),
    ("fi", "Finnois"),
    ("el", "Grec"),
    ("no", "Norvégien"),
    ("sv", "Suédois"),
    ("cs", "Tchèque"),
    ("uk", "Ukrainien"),
];

/// Display name for an ISO 639-1 code; unknown codes are shown as-is.
pub fn language_label(code: &str) -> &str {
    LANGUAGE_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
