use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{DirectoryError, DirectoryLookup, parse_id, resolve_recipients, resolve_tokens};
use crate::recipients::normalize_recipients;

#[derive(Default)]
struct StubDirectory {
    entries: HashMap<String, String>,
    ambiguous: HashSet<String>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl StubDirectory {
    fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(id, mail)| (id.to_string(), mail.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn ambiguous(mut self, id: &str) -> Self {
        self.ambiguous.insert(id.to_string());
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DirectoryLookup for StubDirectory {
    fn lookup(&self, id: &str) -> Result<Option<String>, DirectoryError> {
        self.calls.borrow_mut().push(id.to_string());
        if self.failing.contains(id) {
            return Err(DirectoryError::Unavailable(format!("lookup of {id} refused")));
        }
        if self.ambiguous.contains(id) {
            return Ok(None);
        }
        Ok(self.entries.get(id).cloned())
    }
}

#[test]
fn parse_id_extracts_single_numeric_run() {
    assert_eq!(parse_id("alen10000001"), Some("10000001"));
    assert_eq!(parse_id("10000001"), Some("10000001"));
    assert_eq!(parse_id("x42y"), Some("42"));
    assert_eq!(parse_id("bob"), None);
    assert_eq!(parse_id("a1b2"), None);
    assert_eq!(parse_id(""), None);
}

#[test]
fn resolves_identifier_tokens() {
    let directory = StubDirectory::with(&[("10000001", "alen@example.com")]);
    let resolved = resolve_tokens(["alen10000001"], &directory).unwrap();
    assert_eq!(resolved, ["alen@example.com"]);
    assert_eq!(directory.calls(), ["10000001"]);
}

#[test]
fn addresses_pass_through_without_lookup() {
    let directory = StubDirectory::default();
    let resolved = resolve_tokens(["jane@x.com", "odd@1@2"], &directory).unwrap();
    assert_eq!(resolved, ["jane@x.com", "odd@1@2"]);
    assert!(directory.calls().is_empty());
}

#[test]
fn unreducible_and_unmatched_tokens_are_dropped() {
    let directory = StubDirectory::with(&[("7", "seven@example.com")]).ambiguous("8");
    let resolved = resolve_tokens(["bob", "a1b2", "u7", "u8", "u9"], &directory).unwrap();
    assert_eq!(resolved, ["seven@example.com"]);
    assert_eq!(directory.calls(), ["7", "8", "9"]);
}

#[test]
fn first_lookup_error_aborts() {
    let directory = StubDirectory::with(&[("1", "one@example.com"), ("3", "three@example.com")])
        .failing("2");
    let err = resolve_tokens(["u1", "u2", "u3"], &directory).unwrap_err();
    assert!(matches!(err, DirectoryError::Unavailable(_)));
    assert_eq!(directory.calls(), ["1", "2"]);
}

#[test]
fn resolution_reapplies_to_precedence() {
    let directory = StubDirectory::with(&[
        ("1", "alen@example.com"),
        ("2", "alen@example.com"),
        ("3", "carol@example.com"),
    ]);
    let lists = normalize_recipients("u1,cc:u2,cc:u3,cc:carol@example.com", ",");
    let resolved = resolve_recipients(&lists, &directory).unwrap();
    assert_eq!(resolved.to, ["alen@example.com"]);
    assert_eq!(resolved.cc, ["carol@example.com"]);
    assert_eq!(directory.calls(), ["1", "2", "3"]);
}

#[test]
fn error_aborts_whole_resolution() {
    let directory = StubDirectory::default().failing("5");
    let lists = normalize_recipients("a@example.com,cc:u5", ",");
    assert!(resolve_recipients(&lists, &directory).is_err());
}
