//! Proxy configuration page.

use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::views;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The proxy configuration page
pub const VIEW: ListView = ListView::new(
    "Proxy configuration",
    Perspective::Administrator,
    "Proxy",
    "/proxies",
);

/// Alert shown once the proxy form is saved
pub const SAVED_ALERT: &str = "Proxy settings were saved";

const EXCLUDED_INPUT: &str = "textarea[aria-label=\"excluded\"]";

/// Proxy protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    Http,
    Https,
}

impl ProxyScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Switch enabling the proxy
    #[must_use]
    pub fn switch(self) -> String {
        format!("#{}Proxy", self.as_str())
    }

    #[must_use]
    pub fn host_input(self) -> String {
        format!("[name=\"{}Host\"]", self.as_str())
    }

    #[must_use]
    pub fn port_input(self) -> String {
        format!("[name=\"{}Port\"]", self.as_str())
    }

    /// Checkbox asking for proxy authentication
    #[must_use]
    pub fn identity_check_box(self) -> String {
        format!("#{}-identity-required", self.as_str())
    }

    #[must_use]
    pub fn credentials_select(self) -> String {
        format!("#{}-proxy-credentials-select-toggle", self.as_str())
    }
}

/// One proxy scheme with its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
    /// Name of a proxy credential, when the proxy needs authentication
    pub credentials: Option<String>,
    /// Hosts that bypass the proxy
    pub excluded: Vec<String>,
}

impl Proxy {
    #[must_use]
    pub fn new(scheme: ProxyScheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            credentials: None,
            excluded: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, name: impl Into<String>) -> Self {
        self.credentials = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_excluded<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Enable the proxy with these settings and save the page
    pub async fn configure(&self, session: &Session) -> TackleResult<()> {
        VIEW.open(session).await?;
        let scheme = self.scheme;
        session.select_check_box(&scheme.switch()).await?;
        session.input_text(&scheme.host_input(), &self.host).await?;
        session
            .input_text(&scheme.port_input(), &self.port.to_string())
            .await?;
        match &self.credentials {
            Some(name) => {
                session.select_check_box(&scheme.identity_check_box()).await?;
                session
                    .select_form_items(&scheme.credentials_select(), name)
                    .await?;
            }
            None => {
                session
                    .unselect_check_box(&scheme.identity_check_box())
                    .await?;
            }
        }
        session
            .input_text(EXCLUDED_INPUT, &self.excluded.join(","))
            .await?;
        save(session).await?;
        info!(scheme = scheme.as_str(), host = %self.host, port = self.port, "proxy configured");
        Ok(())
    }

    /// Check the page shows these settings
    pub async fn validate(&self, session: &Session) -> TackleResult<()> {
        VIEW.open(session).await?;
        let scheme = self.scheme;
        session.validate_value(&scheme.host_input(), &self.host).await?;
        session
            .validate_value(&scheme.port_input(), &self.port.to_string())
            .await?;
        if let Some(name) = &self.credentials {
            session.expect_text(&scheme.credentials_select(), name).await?;
        }
        session
            .validate_value(EXCLUDED_INPUT, &self.excluded.join(","))
            .await
    }

    /// Switch the proxy for `scheme` off and save the page
    pub async fn disable(session: &Session, scheme: ProxyScheme) -> TackleResult<()> {
        VIEW.open(session).await?;
        session.unselect_check_box(&scheme.switch()).await?;
        save(session).await?;
        info!(scheme = scheme.as_str(), "proxy disabled");
        Ok(())
    }
}

async fn save(session: &Session) -> TackleResult<()> {
    session.submit_form().await?;
    session
        .check_success_alert(views::SUCCESS_ALERT, SAVED_ALERT)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lifecycle::Creatable;
    use crate::mock::testing::logged_in;
    use crate::models::{CredentialKind, Credentials};

    #[tokio::test]
    async fn test_configure_with_credentials() {
        let (fake, s) = logged_in().await;
        Credentials::new("proxy-login", CredentialKind::Proxy)
            .with_login("squid", "pw")
            .create(&s)
            .await
            .unwrap();
        let proxy = Proxy::new(ProxyScheme::Https, "proxy.corp", 3128)
            .with_credentials("proxy-login")
            .with_excluded(["localhost", "*.corp"]);
        proxy.configure(&s).await.unwrap();

        let saved = fake.proxy();
        assert!(saved.https.enabled);
        assert_eq!(saved.https.host, "proxy.corp");
        assert_eq!(saved.https.port, "3128");
        assert_eq!(saved.https.credentials.as_deref(), Some("proxy-login"));
        assert_eq!(saved.excluded, vec!["localhost", "*.corp"]);
        assert!(!saved.http.enabled);
        proxy.validate(&s).await.unwrap();
    }

    #[tokio::test]
    async fn test_disable_keeps_other_scheme() {
        let (fake, s) = logged_in().await;
        Proxy::new(ProxyScheme::Http, "h1", 8080).configure(&s).await.unwrap();
        Proxy::new(ProxyScheme::Https, "h2", 8443).configure(&s).await.unwrap();
        Proxy::disable(&s, ProxyScheme::Http).await.unwrap();
        let saved = fake.proxy();
        assert!(!saved.http.enabled);
        assert!(saved.https.enabled);
        assert_eq!(saved.https.host, "h2");
    }
}
