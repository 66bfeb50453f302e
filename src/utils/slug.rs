use unicode_normalization::UnicodeNormalization;

/// URL slug: accents stripped, lowercased, anything outside `[a-z0-9 -]`
/// dropped, then runs of whitespace and hyphens collapsed into one hyphen.
pub fn slugify(text: &str) -> String {
    let ascii: String = text
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut in_separator = false;
    for c in ascii.trim().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_separator = false;
        } else if c.is_ascii_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        }
    }
    slug
}
