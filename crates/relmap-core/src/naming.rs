//! Naming conversion utilities
//!
//! Pure string functions used by the registries to compose qualified factory
//! keys (camel case) and logical connection names (snake case) from entity
//! names.

/// Convert a separated token to camel case.
///
/// Splits on `separator`, capitalizes the first letter of every segment, and
/// concatenates. When `capitalize_first` is false the leading segment keeps a
/// lowercase first letter.
///
/// ```
/// use relmap_core::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("user_account", '_', true), "UserAccount");
/// assert_eq!(to_camel_case("user_account", '_', false), "userAccount");
/// assert_eq!(to_camel_case("blog.comment", '.', true), "BlogComment");
/// ```
pub fn to_camel_case(token: &str, separator: char, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(token.len());
    for (i, segment) in token.split(separator).filter(|s| !s.is_empty()).enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 && !capitalize_first {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert a camel-case token to separated lowercase.
///
/// Inserts `separator` before every uppercase letter (except a leading one)
/// and lowercases the result. Already-lowercase tokens pass through
/// unchanged.
///
/// ```
/// use relmap_core::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("UserAccount", '_'), "user_account");
/// assert_eq!(to_snake_case("user", '_'), "user");
/// ```
pub fn to_snake_case(token: &str, separator: char) -> String {
    let mut out = String::with_capacity(token.len());
    for (i, c) in token.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push(separator);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
