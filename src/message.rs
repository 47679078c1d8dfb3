/// Default admin-editable message template. `{name}` and `{score}` are
/// substituted per student at link-build time.
pub const DEFAULT_TEMPLATE: &str =
    "Hi {name}! Your leaderboard score was just updated — you now have {score} points. Keep it up!";

/// Build a `scheme://send?phone=..&text=..` deep link that opens the
/// messaging app directly, skipping the browser confirmation page.
///
/// The stored phone is normalized to international form: formatting
/// characters (spaces, dashes, parentheses, a leading `+`) are stripped
/// and a leading trunk `0` is dropped before prefixing the country code.
/// Returns `None` when no digits remain.
pub fn build_send_link(
    scheme: &str,
    country_code: &str,
    raw_phone: &str,
    name: &str,
    score: f64,
    template: &str,
) -> Option<String> {
    let digits: String = raw_phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let national = digits.strip_prefix('0').unwrap_or(&digits);

    let message = template
        .replace("{name}", name)
        .replace("{score}", &format_score(score));

    Some(format!(
        "{scheme}://send?phone={country_code}{national}&text={}",
        percent_encode(&message)
    ))
}

/// Thousands-separated score rendering for message text ("1,234" /
/// "1,234.5"). Mirrors the comma-grouped numbers the sheets themselves
/// use, which `parse_num` strips back out.
pub fn format_score(score: f64) -> String {
    let rendered = score.to_string();
    let (number, fraction) = match rendered.split_once('.') {
        Some((n, f)) => (n.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let (sign, int_part) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number.as_str()),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        let remaining = int_part.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Percent-encode with `encodeURIComponent` semantics: everything except
/// ASCII alphanumerics and `- _ . ! ~ * ' ( )` is escaped, multibyte
/// characters byte by byte.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(*byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
