//! BIO label parsing for token-classification output

/// Entity groups that count as skill candidates. LOC is recognized by the
/// model but never correlates with skills, so it is excluded.
pub const ALLOWED_GROUPS: [&str; 3] = ["ORG", "MISC", "PER"];

/// A parsed BIO tag, e.g. `B-ORG` or `I-PER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BioLabel<'a> {
    /// True for `B-` tags (span start), false for `I-` continuations.
    pub begins: bool,
    pub group: &'a str,
}

/// Parse a BIO tag. `O` and anything unrecognized yield `None`.
pub fn parse_bio(label: &str) -> Option<BioLabel<'_>> {
    let (prefix, group) = label.split_once('-')?;
    match prefix {
        "B" => Some(BioLabel {
            begins: true,
            group,
        }),
        "I" => Some(BioLabel {
            begins: false,
            group,
        }),
        _ => None,
    }
}

pub fn is_allowed_group(group: &str) -> bool {
    ALLOWED_GROUPS.contains(&group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_begin_and_inside_tags() {
        let b = parse_bio("B-ORG").unwrap();
        assert!(b.begins);
        assert_eq!(b.group, "ORG");

        let i = parse_bio("I-PER").unwrap();
        assert!(!i.begins);
        assert_eq!(i.group, "PER");
    }

    #[test]
    fn outside_and_garbage_tags_parse_to_none() {
        assert!(parse_bio("O").is_none());
        assert!(parse_bio("").is_none());
        assert!(parse_bio("X-ORG").is_none());
        assert!(parse_bio("ORG").is_none());
    }

    #[test]
    fn allow_list_excludes_locations() {
        assert!(is_allowed_group("ORG"));
        assert!(is_allowed_group("MISC"));
        assert!(is_allowed_group("PER"));
        assert!(!is_allowed_group("LOC"));
        assert!(!is_allowed_group("DATE"));
    }
}
