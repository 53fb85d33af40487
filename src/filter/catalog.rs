// Fri Oct 16 2026 - Alex

use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Per sub-library symbol allowlists.
///
/// ```text
/// [cpu_feature_guard]
/// InfoAboutUnusedCPUFeatures
///
/// [tfe_wrapper]
/// TFE_
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    sections: IndexMap<String, Vec<String>>,
}

impl SymbolCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Best-effort parse. A repeated section replaces the earlier one.
    pub fn parse(text: &str) -> Self {
        let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut current: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = match header.split_once(']') {
                    Some((name, _)) => name.trim(),
                    None => {
                        log::debug!("catalog line {}: unterminated section header", lineno + 1);
                        header.trim()
                    }
                };
                if sections.insert(name.to_string(), Vec::new()).is_some() {
                    log::warn!("catalog section [{}] declared twice, keeping the last one", name);
                }
                current = Some(name.to_string());
                continue;
            }

            match &current {
                Some(name) => {
                    if let Some(patterns) = sections.get_mut(name) {
                        patterns.push(line.to_string());
                    }
                }
                None => log::debug!("catalog line {}: pattern outside any section", lineno + 1),
            }
        }

        Self { sections }
    }

    /// Sections whose library name occurs in `path`, in catalog order.
    pub fn sections_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.sections
            .iter()
            .filter(move |(name, _)| path.contains(name.as_str()))
            .map(|(name, patterns)| (name.as_str(), patterns.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl SymbolCatalog {
        fn patterns(&self, library: &str) -> Option<&[String]> {
            self.sections.get(library).map(Vec::as_slice)
        }
    }

    #[test]
    fn test_parse_sections() {
        let catalog = SymbolCatalog::parse("[libA]\nFoo\n\n  Bar  \n[libB]\nBaz\n");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.patterns("libA").unwrap(), ["Foo", "Bar"]);
        assert_eq!(catalog.patterns("libB").unwrap(), ["Baz"]);
    }

    #[test]
    fn test_empty_section_is_legal() {
        let catalog = SymbolCatalog::parse("[empty]\n\n[libA]\nFoo\n");
        assert_eq!(catalog.patterns("empty").unwrap().len(), 0);
    }

    #[test]
    fn test_duplicate_section_last_wins() {
        let catalog = SymbolCatalog::parse("[libA]\nFoo\n[libB]\nX\n[libA]\nBar\n");
        assert_eq!(catalog.patterns("libA").unwrap(), ["Bar"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_tolerates_anomalies() {
        let catalog = SymbolCatalog::parse("stray\n[libA] # comment\nFoo\n[broken\nBar\n");
        assert_eq!(catalog.patterns("libA").unwrap(), ["Foo"]);
        assert_eq!(catalog.patterns("broken").unwrap(), ["Bar"]);
    }

    #[test]
    fn test_sections_for_substring_match() {
        let catalog = SymbolCatalog::parse("[libA]\nFoo\n[libB]\nBar\n[lib]\nAll\n");
        let names: Vec<_> = catalog
            .sections_for("/out/libA.lib")
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["libA", "lib"]);
        assert_eq!(catalog.sections_for("/out/other.a").count(), 0);
    }
}
