use std::collections::HashSet;

/// Ordered list of addresses without duplicates (exact string match).
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList(
    #[cfg_attr(feature = "with-serde", serde(deserialize_with = "dedup_entries"))] Vec<String>,
);

impl AddressList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `address` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, address: impl Into<String>) -> bool {
        let address = address.into();
        if self.contains(&address) {
            return false;
        }
        self.0.push(address);
        true
    }

    pub fn contains(&self, address: &str) -> bool {
        self.0.iter().any(|a| a == address)
    }

    /// Entries of `self` absent from `other`, order preserved.
    pub fn difference(&self, other: &AddressList) -> AddressList {
        let exclude: HashSet<&str> = other.iter().collect();
        self.iter()
            .filter(|a| !exclude.contains(a))
            .map(str::to_string)
            .collect()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.0.retain(|a| keep(a));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for AddressList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for item in iter {
            let item = item.into();
            if seen.insert(item.clone()) {
                out.push(item);
            }
        }
        Self(out)
    }
}

#[cfg(feature = "with-serde")]
fn dedup_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = <Vec<String> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(entries.into_iter().collect::<AddressList>().into_vec())
}

impl IntoIterator for AddressList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PartialEq<[&str]> for AddressList {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == *b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for AddressList {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

/// To/Cc buckets of one recipient specification. An address never appears in
/// both; To wins.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawRecipientLists")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientLists {
    pub to: AddressList,
    pub cc: AddressList,
}

#[cfg(feature = "with-serde")]
#[derive(serde::Deserialize)]
struct RawRecipientLists {
    #[serde(default)]
    to: AddressList,
    #[serde(default)]
    cc: AddressList,
}

#[cfg(feature = "with-serde")]
impl From<RawRecipientLists> for RecipientLists {
    fn from(raw: RawRecipientLists) -> Self {
        Self::new(raw.to, raw.cc)
    }
}

impl RecipientLists {
    /// Builds the pair, dropping from `cc` whatever `to` already holds.
    pub fn new(to: AddressList, cc: AddressList) -> Self {
        let cc = cc.difference(&to);
        Self { to, cc }
    }

    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty()
    }

    pub fn total(&self) -> usize {
        self.to.len() + self.cc.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_keeps_first_occurrence() {
        let list: AddressList = ["a", "a", "b", "a", "c", "b"].into_iter().collect();
        assert_eq!(list, ["a", "b", "c"]);
    }

    #[test]
    fn push_ignores_duplicates() {
        let mut list = AddressList::new();
        assert!(list.push("alen@example.com"));
        assert!(!list.push("alen@example.com"));
        assert!(list.push("bob@example.com"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn difference_preserves_order() {
        let cc: AddressList = ["c", "a", "d", "b"].into_iter().collect();
        let to: AddressList = ["a", "b"].into_iter().collect();
        assert_eq!(cc.difference(&to), ["c", "d"]);
        assert_eq!(cc.difference(&AddressList::new()), cc);
        assert!(AddressList::new().difference(&to).is_empty());
    }

    #[test]
    fn lists_enforce_to_precedence() {
        let to: AddressList = ["alice@example.com"].into_iter().collect();
        let cc: AddressList = ["alice@example.com", "bob@example.com"]
            .into_iter()
            .collect();
        let lists = RecipientLists::new(to, cc);
        assert_eq!(lists.to, ["alice@example.com"]);
        assert_eq!(lists.cc, ["bob@example.com"]);
        assert_eq!(lists.total(), 2);
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn deserialize_applies_dedup_and_to_precedence() {
        let lists: RecipientLists =
            serde_json::from_str(r#"{"to":["a@x.io"],"cc":["a@x.io","b@x.io","b@x.io"]}"#)
                .unwrap();
        assert_eq!(lists.to, ["a@x.io"]);
        assert_eq!(lists.cc, ["b@x.io"]);

        let list: AddressList = serde_json::from_str(r#"["b@x.io","a@x.io","b@x.io"]"#).unwrap();
        assert_eq!(list, ["b@x.io", "a@x.io"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["b@x.io","a@x.io"]"#);
    }
}
