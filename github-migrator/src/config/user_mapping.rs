//! Source to target login mapping.

/// Ordered `source login -> target login` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMapping {
    pairs: Vec<(String, String)>,
}

impl UserMapping {
    /// Parses `"alice:alice-corp, bob:robert"`.
    ///
    /// Entries without exactly one `:` or with an empty side are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split(',')
            .filter_map(|entry| {
                let (from, to) = entry.split_once(':')?;
                let (from, to) = (from.trim(), to.trim());
                if from.is_empty() || to.is_empty() || to.contains(':') {
                    return None;
                }
                Some((from.to_string(), to.to_string()))
            })
            .collect();
        Self { pairs }
    }

    /// Returns the mapped login of `login`, if any.
    #[must_use]
    pub fn get(&self, login: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(from, _)| from == login)
            .map(|(_, to)| to.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, S)> for UserMapping {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}
