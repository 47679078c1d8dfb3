/// Strip hidden unicode direction/zero-width marks that can appear in
/// Hebrew spreadsheet cells, then trim. Stripping happens before the trim
/// so a mark sitting outside edge whitespace cannot shield it; the result
/// is idempotent.
pub fn clean_str(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| !is_invisible_mark(*c))
        .collect();
    stripped.trim().to_string()
}

fn is_invisible_mark(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{202A}'..='\u{202E}')
}

/// Lenient numeric parse for sheet cells: drop thousands-separator commas,
/// trim, parse as float. Absent/empty/non-numeric input is 0.0, never an
/// error.
pub fn parse_num(input: Option<&str>) -> f64 {
    let Some(raw) = input else {
        return 0.0;
    };
    let cleaned = raw.replace(',', "");
    cleaned.trim().parse::<f64>().unwrap_or(0.0)
}
