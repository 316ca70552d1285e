use std::time::Duration;

use ldap3::{LdapConn, LdapConnSettings, Scope, SearchEntry, ldap_escape};
use tracing::{debug, warn};

use super::{DirectoryError, DirectoryLookup};

/// Connection and search parameters for [`LdapDirectory`].
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Search base, e.g. `dc=example,dc=com`.
    pub base: String,
    /// Attribute matched against the identifier.
    pub filter_attr: String,
    /// Attribute holding the e-mail address.
    pub mail_attr: String,
    pub starttls: bool,
    pub tls_verify: bool,
    /// 0 disables the connection timeout.
    pub timeout_ms: u64,
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 389,
            user: String::new(),
            pass: String::new(),
            base: String::new(),
            filter_attr: "sAMAccountName".to_string(),
            mail_attr: "mail".to_string(),
            starttls: true,
            tls_verify: false,
            timeout_ms: 10_000,
        }
    }
}

impl LdapSettings {
    pub fn url(&self) -> String {
        format!("ldap://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub(crate) fn search_filter(&self, id: &str) -> String {
        format!("({}={})", self.filter_attr, ldap_escape(id))
    }
}

/// One connection per lookup: dial, optional StartTLS, simple bind, subtree
/// search, unbind.
#[derive(Debug, Clone)]
pub struct LdapDirectory {
    settings: LdapSettings,
}

impl LdapDirectory {
    pub fn new(settings: LdapSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LdapSettings {
        &self.settings
    }

    fn connect(&self) -> Result<LdapConn, DirectoryError> {
        let url = self.settings.url();
        let mut conn_settings = LdapConnSettings::new()
            .set_starttls(self.settings.starttls)
            .set_no_tls_verify(!self.settings.tls_verify);
        if let Some(timeout) = self.settings.timeout() {
            conn_settings = conn_settings.set_conn_timeout(timeout);
        }

        let mut conn = LdapConn::with_settings(conn_settings, &url)
            .map_err(|source| DirectoryError::connect(url.as_str(), source))?;
        conn.simple_bind(&self.settings.user, &self.settings.pass)
            .and_then(|result| result.success())
            .map_err(|source| DirectoryError::bind(self.settings.user.as_str(), source))?;
        Ok(conn)
    }
}

impl DirectoryLookup for LdapDirectory {
    fn lookup(&self, id: &str) -> Result<Option<String>, DirectoryError> {
        let mut conn = self.connect()?;
        let filter = self.settings.search_filter(id);
        let (entries, _) = conn
            .search(
                &self.settings.base,
                Scope::Subtree,
                &filter,
                vec![self.settings.mail_attr.as_str()],
            )
            .and_then(|result| result.success())
            .map_err(|source| {
                DirectoryError::search(self.settings.base.as_str(), filter.as_str(), source)
            })?;
        if let Err(err) = conn.unbind() {
            warn!(error = %err, "directory unbind failed");
        }

        if entries.len() != 1 {
            debug!(filter = filter.as_str(), matches = entries.len(), "no unique entry");
            return Ok(None);
        }

        let entry = entries.into_iter().next().map(SearchEntry::construct);
        Ok(entry.and_then(|entry| {
            entry
                .attrs
                .into_iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&self.settings.mail_attr))
                .and_then(|(_, values)| values.into_iter().next())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_active_directory() {
        let settings = LdapSettings::default();
        assert_eq!(settings.url(), "ldap://localhost:389");
        assert_eq!(settings.filter_attr, "sAMAccountName");
        assert_eq!(settings.mail_attr, "mail");
        assert!(settings.starttls);
    }

    #[test]
    fn search_filter_escapes_value() {
        let settings = LdapSettings::default();
        assert_eq!(
            settings.search_filter("10000001"),
            "(sAMAccountName=10000001)"
        );
        assert_eq!(settings.search_filter("a*)("), "(sAMAccountName=a\\2a\\29\\28)");
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let settings = LdapSettings {
            timeout_ms: 0,
            ..LdapSettings::default()
        };
        assert_eq!(settings.timeout(), None);
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn settings_from_partial_json() {
        let settings: LdapSettings = serde_json::from_str(
            r#"{"host":"ldap.example.com","user":"cn=svc","pass":"s3cret","base":"dc=example,dc=com"}"#,
        )
        .unwrap();
        assert_eq!(settings.host, "ldap.example.com");
        assert_eq!(settings.port, 389);
        assert_eq!(settings.base, "dc=example,dc=com");
        assert_eq!(settings.mail_attr, "mail");
    }
}
