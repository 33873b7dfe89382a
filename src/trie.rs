//! Reversed-key trie for matching place keywords at the end of a text segment.
//!
//! Keys are stored back to front so a single walk from the end of the input
//! finds the longest keyword that the input ends with. Matching ignores case
//! and dots, which lets `u.s.a.` hit the key `USA`.

use std::collections::HashMap;

/// Trie node
#[derive(Debug)]
struct TrieNode<T> {
    children: HashMap<char, TrieNode<T>>,
    /// Set when a complete key ends at this node
    value: Option<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

/// Case-insensitive keyword trie matched from the end of the text.
#[derive(Debug)]
pub struct KeywordTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for KeywordTrie<T> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
        }
    }
}

/// Folds a character for matching. Dots are skipped entirely.
fn fold(ch: char) -> Option<char> {
    if ch == '.' {
        return None;
    }
    Some(ch.to_lowercase().next().unwrap_or(ch))
}

impl<T> KeywordTrie<T> {
    /// Creates an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a keyword and its value. Later inserts of the same key win.
    pub fn insert(&mut self, keyword: &str, value: T) {
        let mut node = &mut self.root;
        for ch in keyword.chars().rev().filter_map(fold) {
            node = node.children.entry(ch).or_default();
        }
        node.value = Some(value);
    }

    /// Exact lookup of a whole text
    pub fn get(&self, text: &str) -> Option<&T> {
        let mut node = &self.root;
        for ch in text.chars().rev().filter_map(fold) {
            node = node.children.get(&ch)?;
        }
        node.value.as_ref()
    }

    /// Whether the whole text is a keyword
    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    /// Finds the longest keyword the text ends with.
    ///
    /// The match must start on a word boundary: either at the start of the text
    /// or right after a character that is not alphanumeric.
    ///
    /// Returns (value, byte offset where the match starts).
    pub fn find_longest_suffix(&self, text: &str) -> Option<(&T, usize)> {
        let mut node = &self.root;
        let mut best = None;
        let mut chars = text.char_indices().rev().peekable();

        while let Some((pos, ch)) = chars.next() {
            if let Some(folded) = fold(ch) {
                match node.children.get(&folded) {
                    Some(next) => node = next,
                    None => break,
                }
            }
            if let Some(ref value) = node.value {
                let at_boundary = chars
                    .peek()
                    .map_or(true, |&(_, before)| !before.is_alphanumeric());
                if at_boundary && fold(ch).is_some() {
                    best = Some((value, pos));
                }
            }
        }

        best
    }
}
