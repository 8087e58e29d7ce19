//! Naming utilities

/// Convert PascalCase or camelCase to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();

    for c in s.chars() {
        if c.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c.is_alphanumeric() {
            result.push(c);
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
    }

    result.trim_end_matches('_').to_string()
}

/// Convert any separated identifier (`snake_case`, `kebab-case`,
/// `user/signup`, `{userId}`) to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Build a display name from document location segments.
///
/// Structural keywords that carry no meaning for a reader are dropped,
/// numeric indexes are kept so siblings stay distinct.
pub fn name_from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    const NOISE: &[&str] = &["components", "properties", "oneOf", "channels", "servers"];

    segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|segment| !NOISE.contains(segment))
        .map(to_pascal_case)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_snake_case("UserSignedUp"), "user_signed_up");
        assert_eq!(to_snake_case("orderId"), "order_id");
        assert_eq!(to_snake_case("user/signup"), "user_signup");
        assert_eq!(to_snake_case("initialize"), "initialize");

        assert_eq!(to_pascal_case("user_signed_up"), "UserSignedUp");
        assert_eq!(to_pascal_case("user/signup"), "UserSignup");
        assert_eq!(to_pascal_case("orders.{orderId}.created"), "OrdersOrderIdCreated");
        assert_eq!(to_pascal_case("kebab-name"), "KebabName");
    }

    #[test]
    fn test_name_from_segments() {
        assert_eq!(
            name_from_segments(&["channels", "user/signup", "publish", "message"]),
            "UserSignupPublishMessage"
        );
        assert_eq!(
            name_from_segments(&["components", "schemas", "Order", "properties", "lines", "items"]),
            "SchemasOrderLinesItems"
        );
        assert_eq!(
            name_from_segments(&["channels", "a", "subscribe", "message", "oneOf", "1"]),
            "ASubscribeMessage1"
        );
    }
}
