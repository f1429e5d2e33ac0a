//! Shared string helpers for identifier derivation.

/// Split a snake-style identifier into its non-empty segments
/// (e.g., "user__accounts" -> ["user", "accounts"])
pub fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split('_').filter(|part| !part.is_empty())
}

/// Upper-case the first character and every letter right after a digit,
/// keep the rest as is (e.g., "user" -> "User", "v2name" -> "V2Name")
pub fn capitalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for c in s.chars() {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper_next = c.is_ascii_digit();
    }
    out
}

/// Lower-case the first character, keep the rest as is (e.g., "UserID" -> "userID")
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
pub fn to_pascal_case(s: &str) -> String {
    segments(s).map(capitalize).collect()
}
