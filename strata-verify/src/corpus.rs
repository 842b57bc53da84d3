//! Fixed Unicode sample written through every scenario.

/// Two bytes per codepoint in UTF-8
pub const GREEK: [&str; 4] = [
    "\u{3b1}\u{3b2}\u{3b3}",
    "\u{3b1}\u{3b2}",
    "\u{3b1}\u{3b2}\u{3b3}\u{3b4}",
    "\u{3b1}\u{3b2}\u{3b3}\u{3b4}",
];

/// Three bytes per codepoint, including combining vowel signs and a virama
pub const MALAYALAM: [&str; 3] = [
    "\u{d06}\u{d30}\u{d3e}",
    "\u{d0e}\u{d28}\u{d4d}\u{d24}\u{d3e}",
    "\u{d13}\u{d7c}\u{d15}\u{d4d}",
];

/// Four-byte emoji, the first mixed with variation selectors
pub const EMOJI: [&str; 3] = [
    "\u{270f}\u{fe0f}\u{1f4dd}\u{270f}\u{fe0f}",
    "\u{1f33b}\u{1f41d}\u{1f36f}",
    "\u{1f37a}\u{1f943}\u{1f377}",
];

/// Ordered input values. `None` is an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCorpus {
    values: Vec<Option<String>>,
}

impl InputCorpus {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// The standard sample: Greek, then Malayalam, then emoji
    pub fn standard() -> Self {
        Self::from_strs(GREEK.iter().chain(&MALAYALAM).chain(&EMOJI).copied())
    }

    pub fn from_strs<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(values.into_iter().map(|s| Some(s.to_string())).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`; the outer `Option` is `None` past the end
    pub fn get(&self, index: usize) -> Option<Option<&str>> {
        self.values.get(index).map(|v| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.values.iter().map(|v| v.as_deref())
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

impl Default for InputCorpus {
    fn default() -> Self {
        Self::standard()
    }
}
