use regex::Regex;

/// Case-insensitive matcher for a command's trigger phrases.
///
/// Matches optional leading whitespace, one of the prefixes, then either
/// whitespace followed by the argument or the end of input.
#[derive(Debug, Clone)]
pub struct PrefixPattern {
    regex: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch<'a> {
    pub prefix: &'a str,
    pub argument: Option<&'a str>,
}

impl PrefixPattern {
    /// Returns `Ok(None)` when there is no non-blank prefix to match.
    pub fn compile(prefixes: &[String]) -> Result<Option<Self>, regex::Error> {
        let alternatives: Vec<String> = prefixes
            .iter()
            .map(|prefix| prefix.trim())
            .filter(|prefix| !prefix.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(None);
        }

        let regex = Regex::new(&format!(
            r"(?i)^\s*({})(?:\s+(.*)|$)",
            alternatives.join("|")
        ))?;
        Ok(Some(Self { regex }))
    }

    pub fn matches<'a>(&self, input: &'a str) -> Option<PrefixMatch<'a>> {
        let captures = self.regex.captures(input)?;
        let prefix = captures.get(1)?.as_str();
        Some(PrefixMatch {
            prefix,
            argument: captures.get(2).map(|m| m.as_str()),
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::{PrefixMatch, PrefixPattern};

    fn pattern(prefixes: &[&str]) -> PrefixPattern {
        let owned: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
        PrefixPattern::compile(&owned)
            .expect("pattern should compile")
            .expect("pattern should exist")
    }

    #[test]
    fn captures_prefix_and_argument() {
        let p = pattern(&["open", "visit"]);
        assert_eq!(
            p.matches("open dash"),
            Some(PrefixMatch {
                prefix: "open",
                argument: Some("dash"),
            })
        );
    }

    #[test]
    fn matches_case_insensitively_with_leading_whitespace() {
        let p = pattern(&["open", "visit"]);
        let matched = p.matches("   VISIT  the docs").unwrap();
        assert_eq!(matched.prefix, "VISIT");
        assert_eq!(matched.argument, Some("the docs"));
    }

    #[test]
    fn bare_prefix_has_no_argument() {
        let p = pattern(&["open"]);
        assert_eq!(
            p.matches("open"),
            Some(PrefixMatch {
                prefix: "open",
                argument: None,
            })
        );
    }

    #[test]
    fn prefix_must_be_a_whole_token() {
        let p = pattern(&["open"]);
        assert!(p.matches("opener").is_none());
        assert!(p.matches("reopen x").is_none());
    }

    #[test]
    fn prefixes_are_literal_text() {
        let p = pattern(&["a.b"]);
        assert!(p.matches("a.b x").is_some());
        assert!(p.matches("axb x").is_none());
    }

    #[test]
    fn blank_prefix_list_compiles_to_nothing() {
        assert!(PrefixPattern::compile(&[]).unwrap().is_none());
        assert!(PrefixPattern::compile(&["  ".to_string()]).unwrap().is_none());
    }
}
