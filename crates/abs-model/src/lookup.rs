use std::collections::HashMap;

/// Case-insensitive view over column names.
///
/// Questionnaire exports disagree on case (`Q7` vs `q7`); lookups go through
/// this set and come back with the spelling the dataset actually uses.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_spelling_wins() {
        let set = CaseInsensitiveSet::new(["Q7", "q7", "se2"]);
        assert_eq!(set.get("q7"), Some("Q7"));
        assert_eq!(set.get("SE2"), Some("se2"));
        assert!(!set.contains("q8"));
    }
}
