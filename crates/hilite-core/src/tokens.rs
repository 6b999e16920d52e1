use crate::types::{Token, TranscriptWord};

/// Ordered transcript tokens. Indices are assigned once, contiguous from 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn from_words(words: &[TranscriptWord]) -> Self {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(index, word)| Token {
                index,
                text: word.text.clone(),
                start_time: word.start_time,
                end_time: word.end_time,
                speaker: word.speaker.clone(),
                labels: Default::default(),
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Label sets are the only mutable part of a token.
    pub(crate) fn add_label(&mut self, index: usize, id: &str) {
        if let Some(token) = self.tokens.get_mut(index) {
            token.labels.insert(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, speaker: &str) -> TranscriptWord {
        TranscriptWord {
            text: text.into(),
            start_time: 0.0,
            end_time: 0.0,
            speaker: speaker.into(),
        }
    }

    #[test]
    fn indices_are_contiguous_from_zero() {
        let store = TokenStore::from_words(&[word("a", "A"), word("b", "A"), word("c", "B")]);
        let indices: Vec<usize> = store.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(store.get(2).unwrap().speaker, "B");
        assert!(store.get(3).is_none());
    }

    #[test]
    fn add_label_ignores_duplicates() {
        let mut store = TokenStore::from_words(&[word("a", "A")]);
        store.add_label(0, "ORG");
        store.add_label(0, "ORG");
        assert_eq!(store.get(0).unwrap().labels.len(), 1);
    }
}
