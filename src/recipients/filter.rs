use super::{AddressList, CC_PREFIX, RecipientLists, split_fields};

/// Domain-suffix allow-list, e.g. `@example1.com,@example2.com`.
pub fn parse_filter(spec: &str, separator: &str) -> Vec<String> {
    split_fields(spec, separator)
        .collect::<AddressList>()
        .into_vec()
}

/// An empty filter lets every address through. The suffix alone is not an
/// address and never matches.
pub fn matches_filter(address: &str, filter: &[String]) -> bool {
    filter.is_empty()
        || filter
            .iter()
            .any(|suffix| address != suffix && address.ends_with(suffix.as_str()))
}

/// `to1,to2,cc:cc1,cc:cc2` + newline, restricted to addresses matching `filter`.
pub fn render_recipients(lists: &RecipientLists, filter: &[String]) -> String {
    let to = lists
        .to
        .iter()
        .filter(|a| matches_filter(a, filter))
        .map(str::to_string);
    let cc = lists
        .cc
        .iter()
        .filter(|a| matches_filter(a, filter))
        .map(|a| format!("{CC_PREFIX}{a}"));

    let mut line = to.chain(cc).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}
