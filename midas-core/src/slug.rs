//! Title → URL-safe filename stem.

use deunicode::deunicode;

/// Derive a lowercase ASCII slug from `title`.
///
/// Unicode is transliterated, every run of non-alphanumeric characters
/// becomes a single `-`, and leading/trailing dashes are dropped.
/// May return an empty string for titles with no alphanumerics.
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "hello-world")]
    #[case("  Hello,   World!  ", "hello-world")]
    #[case("Rust 2024: what's new?", "rust-2024-what-s-new")]
    #[case("Zażółć gęślą jaźń", "zazolc-gesla-jazn")]
    #[case("already-a-slug", "already-a-slug")]
    #[case("---", "")]
    fn slugify_cases(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(slugify(title), expected);
    }

    #[test]
    fn slugify_is_deterministic() {
        let title = "The Same Title, Twice";
        assert_eq!(slugify(title), slugify(title));
    }
}
