/// Strips separator characters from names and compares them case-insensitively.
///
/// `order_date`, `orderDate`, `Order-Date` and `ORDER DATE` all match each
/// other. There is no partial matching, `id` never matches `identity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameNormalizer {
    separators: Vec<char>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new("-_.")
    }
}

impl NameNormalizer {
    /// `separators` are stripped in addition to whitespace.
    pub fn new(separators: &str) -> Self {
        Self {
            separators: separators.chars().collect(),
        }
    }

    fn is_separator(&self, c: char) -> bool {
        c.is_whitespace() || self.separators.contains(&c)
    }

    /// Remove every separator character. Case is left untouched.
    pub fn normalize(&self, name: &str) -> String {
        name.chars().filter(|c| !self.is_separator(*c)).collect()
    }

    /// `a` and `b` name the same thing, either verbatim or after normalization.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        eq_ignore_case(a, b) || eq_ignore_case(&self.normalize(a), &self.normalize(b))
    }

    /// Like [`matches`](Self::matches) with `b` already normalized.
    pub(crate) fn matches_normalized(&self, a: &str, b: &str, b_normalized: &str) -> bool {
        eq_ignore_case(a, b) || eq_ignore_case(&self.normalize(a), b_normalized)
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_separators_keeps_case() {
        let names = NameNormalizer::default();
        assert_eq!(names.normalize("order_date"), "orderdate");
        assert_eq!(names.normalize("Order-Date"), "OrderDate");
        assert_eq!(names.normalize("a.b c\td"), "abcd");
    }

    #[test]
    fn snake_and_camel_match() {
        let names = NameNormalizer::default();
        for member in ["userName", "UserName", "user_name", "USER_NAME"] {
            assert!(names.matches(member, "user_name"), "{member}");
            assert!(names.matches("user_name", member), "{member}");
        }
    }

    #[test]
    fn no_partial_matches() {
        let names = NameNormalizer::default();
        assert!(!names.matches("identity", "id"));
        assert!(!names.matches("id", "identity"));
        assert!(!names.matches("user", "user_name"));
    }

    #[test]
    fn custom_separators() {
        let names = NameNormalizer::new("$");
        assert!(names.matches("total$amount", "totalAmount"));
        assert!(!names.matches("total_amount", "totalAmount"));
        assert!(names.matches("total amount", "totalAmount"));
    }

    #[test]
    fn non_ascii_case_folding() {
        assert!(eq_ignore_case("Straße", "STRAßE"));
        assert!(eq_ignore_case("ÉTÉ", "été"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(name in "[a-zA-Z0-9_. -]{0,24}") {
            let names = NameNormalizer::default();
            let once = names.normalize(&name);
            prop_assert_eq!(names.normalize(&once), once.clone());
        }

        #[test]
        fn separator_placement_does_not_matter(
            words in proptest::collection::vec("[a-z]{1,6}", 1..5),
            sep in "[-_. ]",
        ) {
            let names = NameNormalizer::default();
            let snake = words.join(sep.as_str());
            let camel: String = words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    if i == 0 {
                        w.clone()
                    } else {
                        let mut chars = w.chars();
                        match chars.next() {
                            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                            None => String::new(),
                        }
                    }
                })
                .collect();
            prop_assert!(names.matches(&camel, &snake));
            prop_assert!(names.matches(&snake, &camel));
        }

        #[test]
        fn matching_is_symmetric(a in "[a-zA-Z_]{0,10}", b in "[a-zA-Z_]{0,10}") {
            let names = NameNormalizer::default();
            prop_assert_eq!(names.matches(&a, &b), names.matches(&b, &a));
        }
    }
}
