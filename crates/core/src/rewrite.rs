use regex::Regex;

use crate::error::ReclaimError;

#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ReclaimError> {
        let pattern = Regex::new(pattern).map_err(|source| ReclaimError::Rewrite {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }
}

/// Ordered table of pattern/replacement pairs used to translate a local
/// path into the path reported to the remote backend. Rules are matched
/// in declaration order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RewriteTable {
    rules: Vec<RewriteRule>,
}

impl RewriteTable {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ReclaimError> {
        let rules = pairs
            .iter()
            .map(|(pattern, replacement)| RewriteRule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replace the leftmost match of the first matching rule; a path no
    /// rule matches comes back unchanged.
    pub fn resolve(&self, location: &str) -> String {
        for rule in &self.rules {
            if let Some(found) = rule.pattern.find(location) {
                return format!(
                    "{}{}{}",
                    &location[..found.start()],
                    rule.replacement,
                    &location[found.end()..]
                );
            }
        }
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::RewriteTable;

    fn table(pairs: &[(&str, &str)]) -> RewriteTable {
        let owned: Vec<_> = pairs
            .iter()
            .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
            .collect();
        RewriteTable::from_pairs(&owned).unwrap()
    }

    #[test]
    fn replaces_matched_prefix() {
        let table = table(&[("/mnt/data", "/remote")]);
        assert_eq!(table.resolve("/mnt/data/x.txt"), "/remote/x.txt");
    }

    #[test]
    fn unmatched_path_is_unchanged() {
        let table = table(&[("/mnt/data", "/remote")]);
        assert_eq!(table.resolve("/srv/media/y.txt"), "/srv/media/y.txt");
    }

    #[test]
    fn first_declared_rule_wins() {
        let table = table(&[("/mnt", "/first"), ("/mnt/data", "/second")]);
        assert_eq!(table.resolve("/mnt/data/x.txt"), "/first/data/x.txt");
    }

    #[test]
    fn patterns_are_regexes() {
        let table = table(&[(r"/disk\d+", "/pool")]);
        assert_eq!(table.resolve("/disk3/movies/a.mkv"), "/pool/movies/a.mkv");
    }

    #[test]
    fn only_the_leftmost_match_is_replaced() {
        let table = table(&[("data", "X")]);
        assert_eq!(table.resolve("/data/data.bin"), "/X/data.bin");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let pairs = vec![("[".to_string(), "/remote".to_string())];
        assert!(RewriteTable::from_pairs(&pairs).is_err());
    }

    #[test]
    fn empty_table_resolves_to_identity() {
        let table = RewriteTable::default();
        assert!(table.is_empty());
        assert_eq!(table.resolve("/mnt/data/x.txt"), "/mnt/data/x.txt");
    }
}
