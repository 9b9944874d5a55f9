//! Human-readable item names derived from callable identifiers.
//!
//! Widget registries fall back to these transforms when a plugin does not
//! supply an explicit name: camel-case factory types become spaced words,
//! snake_case functions get their underscores replaced.

/// Split a camel-case identifier into spaced words.
///
/// A space is inserted before an uppercase letter that either follows a
/// lowercase letter or precedes one, so acronym runs stay intact:
/// `"FancyWidget"` becomes `"Fancy Widget"` and `"ABCMeta"` stays `"ABC Meta"`.
pub fn camel_to_spaces(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let after_lower = chars[i - 1].is_lowercase();
            let before_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if after_lower || before_lower {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}

/// Replace underscores in a snake_case identifier with spaces.
pub fn snake_to_spaces(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_spaces() {
        assert_eq!(camel_to_spaces("FancyWidget"), "Fancy Widget");
        assert_eq!(camel_to_spaces("QWidget"), "Q Widget");
        assert_eq!(camel_to_spaces("ABCMeta"), "ABC Meta");
        assert_eq!(camel_to_spaces("Widget"), "Widget");
        assert_eq!(camel_to_spaces(""), "");
    }

    #[test]
    fn test_snake_to_spaces() {
        assert_eq!(snake_to_spaces("make_thing"), "make thing");
        assert_eq!(snake_to_spaces("plain"), "plain");
    }
}
