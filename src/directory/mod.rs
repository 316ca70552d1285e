//! Resolution of bare identifiers (`alen10000001`) into directory addresses.
//!
//! The entry point is [`resolve_tokens`]; the directory itself sits behind
//! [`DirectoryLookup`] so that the resolution rules can run without network.
//! [`LdapDirectory`] is the LDAP implementation (`with-ldap` feature).

mod error;
#[cfg(feature = "with-ldap")]
mod ldap;

pub use error::DirectoryError;
#[cfg(feature = "with-ldap")]
pub use ldap::{LdapDirectory, LdapSettings};

use tracing::debug;

use crate::recipients::{AddressList, RecipientLists};

pub trait DirectoryLookup {
    /// Address of the single entry matching `id`, `None` when zero or several
    /// entries match.
    fn lookup(&self, id: &str) -> Result<Option<String>, DirectoryError>;
}

impl<D: DirectoryLookup + ?Sized> DirectoryLookup for &D {
    fn lookup(&self, id: &str) -> Result<Option<String>, DirectoryError> {
        (**self).lookup(id)
    }
}

/// The token's only run of numeric characters, or `None` when it has zero
/// or several runs.
pub fn parse_id(token: &str) -> Option<&str> {
    let mut runs = token
        .split(|c: char| !c.is_numeric())
        .filter(|run| !run.is_empty());
    match (runs.next(), runs.next()) {
        (Some(id), None) => Some(id),
        _ => None,
    }
}

/// Tokens containing `@` pass through untouched; other tokens are reduced
/// with [`parse_id`] and looked up. Unreducible tokens and identifiers
/// without a match are dropped. The first hard lookup error aborts the batch.
pub fn resolve_tokens<I, S, D>(tokens: I, directory: &D) -> Result<AddressList, DirectoryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    D: DirectoryLookup + ?Sized,
{
    let mut addresses = AddressList::new();
    for token in tokens {
        let token = token.as_ref();
        if token.contains('@') {
            addresses.push(token);
            continue;
        }
        let Some(id) = parse_id(token) else {
            debug!(token, "token does not reduce to an identifier, dropped");
            continue;
        };
        match directory.lookup(id)? {
            Some(address) => {
                debug!(token, id, address = address.as_str(), "identifier resolved");
                addresses.push(address);
            }
            None => debug!(token, id, "no unique directory entry"),
        }
    }
    Ok(addresses)
}

/// Resolves both buckets, To first, then re-applies To precedence since two
/// identifiers may resolve to the same address.
pub fn resolve_recipients<D>(
    lists: &RecipientLists,
    directory: &D,
) -> Result<RecipientLists, DirectoryError>
where
    D: DirectoryLookup + ?Sized,
{
    let to = resolve_tokens(lists.to.iter(), directory)?;
    let cc = resolve_tokens(lists.cc.iter(), directory)?;
    Ok(RecipientLists::new(to, cc))
}

#[cfg(test)]
mod tests;
