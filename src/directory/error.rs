use thiserror::Error;

/// Hard directory failures. "No match" and "several matches" are not errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[cfg(feature = "with-ldap")]
    #[error("cannot connect to directory {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: ldap3::LdapError,
    },
    #[cfg(feature = "with-ldap")]
    #[error("directory bind as {user:?} failed: {source}")]
    Bind {
        user: String,
        #[source]
        source: ldap3::LdapError,
    },
    #[cfg(feature = "with-ldap")]
    #[error("directory search {filter} under {base:?} failed: {source}")]
    Search {
        base: String,
        filter: String,
        #[source]
        source: ldap3::LdapError,
    },
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "with-ldap")]
impl DirectoryError {
    pub(crate) fn connect(url: impl Into<String>, source: ldap3::LdapError) -> Self {
        Self::Connect {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn bind(user: impl Into<String>, source: ldap3::LdapError) -> Self {
        Self::Bind {
            user: user.into(),
            source,
        }
    }

    pub(crate) fn search(
        base: impl Into<String>,
        filter: impl Into<String>,
        source: ldap3::LdapError,
    ) -> Self {
        Self::Search {
            base: base.into(),
            filter: filter.into(),
            source,
        }
    }
}
