use std::collections::{BTreeMap, btree_map};

/// Decoded URL-encoded pairs.
///
/// Keys map to every value seen for them, in encounter order. An empty key is
/// stored as `None` (the "unnamed" key) and an empty value as `None`, so
/// `k` and `k=` both decode to `{Some("k"): [None]}`.
///
/// # Examples
///
/// ```
/// use plankton::parse_url_encoded;
///
/// let form = parse_url_encoded("tag=a&tag=b&=anon&flag".as_bytes()).unwrap();
/// assert_eq!(form.first("tag"), Some("a"));
/// assert_eq!(form.get("tag").unwrap().len(), 2);
/// assert_eq!(form.get_unnamed(), Some(&[Some("anon".to_string())][..]));
/// assert_eq!(form.get("flag"), Some(&[None][..]));
/// ```
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: BTreeMap<Option<String>, Vec<Option<String>>>,
}

impl FormData {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All values recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Option<String>]> {
        self.pairs
            .get(&Some(key.to_owned()))
            .map(Vec::as_slice)
    }

    /// All values recorded for the empty key.
    #[must_use]
    pub fn get_unnamed(&self) -> Option<&[Option<String>]> {
        self.pairs.get(&None).map(Vec::as_slice)
    }

    /// The first value recorded for `key`, unless it was empty.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first()?.as_deref()
    }

    /// Records one more value for `key`.
    pub fn insert(&mut self, key: Option<String>, value: Option<String>) {
        self.pairs.entry(key).or_default().push(value);
    }

    /// Iterates keys in sorted order (the unnamed key first).
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &[Option<String>])> {
        self.pairs
            .iter()
            .map(|(key, values)| (key.as_deref(), values.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when no pair was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Unwraps the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<Option<String>, Vec<Option<String>>> {
        self.pairs
    }
}

impl FromIterator<(Option<String>, Option<String>)> for FormData {
    fn from_iter<I: IntoIterator<Item = (Option<String>, Option<String>)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

impl IntoIterator for FormData {
    type Item = (Option<String>, Vec<Option<String>>);
    type IntoIter = btree_map::IntoIter<Option<String>, Vec<Option<String>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
