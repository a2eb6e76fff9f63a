//! Slug derivation for store names

/// Derive a URL slug from free text.
///
/// Lower-cases, drops every character that is not an ASCII letter, digit,
/// whitespace or hyphen, and collapses whitespace/hyphen runs into a single
/// `-`. Leading and trailing hyphens are trimmed.
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug submitted for a new store: name slug suffixed with the area slug.
pub fn store_slug(name_slug: &str, address_line2: &str) -> String {
    let area = create_slug(address_line2);
    match (name_slug.is_empty(), area.is_empty()) {
        (_, true) => name_slug.to_string(),
        (true, false) => area,
        (false, false) => format!("{name_slug}-{area}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slug() {
        assert_eq!(create_slug("Joe's Cafe"), "joes-cafe");
        assert_eq!(create_slug("  Big   Bazaar -- Outlet "), "big-bazaar-outlet");
        assert_eq!(create_slug("Café #1"), "caf-1");
        assert_eq!(create_slug("!!!"), "");
    }

    #[test]
    fn test_store_slug_appends_area() {
        assert_eq!(store_slug("joes-cafe", "MG Road"), "joes-cafe-mg-road");
        assert_eq!(store_slug("joes-cafe", ""), "joes-cafe");
        assert_eq!(store_slug("", "MG Road"), "mg-road");
    }
}
