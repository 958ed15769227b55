//! Phrase match selector

/// Flags tokens that contain any of a set of phrases, ignoring case.
///
/// Matching is plain substring containment and is not aware of token
/// boundaries: the phrase "ann" flags the token "Anne,".
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    phrases: Vec<String>,
}

impl PhraseMatcher {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|phrase| phrase.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_target(&self, token: &str) -> bool {
        if self.phrases.is_empty() {
            return false;
        }
        let token = token.to_lowercase();
        self.phrases.iter().any(|phrase| token.contains(phrase.as_str()))
    }
}

/// One flag per token, in order
pub fn select_flags<T, P>(tokens: &[T], phrases: &[P]) -> Vec<bool>
where
    T: AsRef<str>,
    P: AsRef<str>,
{
    let matcher = PhraseMatcher::new(phrases);
    tokens
        .iter()
        .map(|token| matcher.is_target(token.as_ref()))
        .collect()
}
