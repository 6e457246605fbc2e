//! Chromium driver over CDP.
//!
//! Elements are tagged with a `data-tackle-id` attribute the first time a
//! query returns them; later calls find them again by that attribute. An
//! element that left the page no longer matches and is reported stale.
//! Forced clicks, clearing and form submission run as page scripts; normal
//! clicks and typing go through CDP input events.

use crate::driver::{Cookie, DriverConfig, ElementHandle, Key, TackleDriver};
use crate::result::{TackleError, TackleResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::{ClearBrowserCookiesParams, CookieParam};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

const ID_ATTR: &str = "data-tackle-id";

const PRELUDE: &str = r"
const __find = (id) => document.querySelector('[data-tackle-id=' + JSON.stringify(id) + ']');
const __snap = (el) => {
  if (!el.hasAttribute('data-tackle-id')) {
    window.__tackleSeq = (window.__tackleSeq || 0) + 1;
    el.setAttribute('data-tackle-id', 't' + window.__tackleSeq);
  }
  const attributes = {};
  for (const a of el.attributes) { attributes[a.name] = a.value; }
  return {
    id: el.getAttribute('data-tackle-id'),
    tag_name: el.tagName.toLowerCase(),
    text: el.textContent || '',
    attributes,
    classes: Array.from(el.classList),
    disabled: !!el.disabled || el.getAttribute('aria-disabled') === 'true',
    checked: !!el.checked,
    value: typeof el.value === 'string' ? el.value : null,
  };
};
const __ok = (value) => JSON.stringify({ status: 'ok', value });
const __stale = () => JSON.stringify({ status: 'stale' });
";

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Reply<T> {
    Ok { value: T },
    Stale,
}

fn driver_error(e: impl std::fmt::Display) -> TackleError {
    TackleError::driver(e.to_string())
}

fn js(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script running `body` with `el` bound to the element `id`
fn on_element(id: &str, body: &str) -> String {
    format!(
        "(() => {{ {PRELUDE} const el = __find({}); if (!el) return __stale(); {body} }})()",
        js(id)
    )
}

/// [`TackleDriver`] backed by a Chromium page
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    pub async fn launch(config: &DriverConfig) -> TackleResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| TackleError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| TackleError::BrowserLaunch {
                    message: e.to_string(),
                })?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| TackleError::BrowserLaunch {
                message: e.to_string(),
            })?;
        info!(headless = config.headless, "chromium launched");
        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: String, id: &str) -> TackleResult<T> {
        let raw: String = self
            .page
            .evaluate(script)
            .await
            .map_err(driver_error)?
            .into_value()
            .map_err(driver_error)?;
        match serde_json::from_str::<Reply<T>>(&raw)? {
            Reply::Ok { value } => Ok(value),
            Reply::Stale => Err(TackleError::StaleElement { id: id.to_string() }),
        }
    }

    async fn element(&self, handle: &ElementHandle) -> TackleResult<Element> {
        self.page
            .find_element(format!("[{ID_ATTR}={}]", js(&handle.id)))
            .await
            .map_err(|_| TackleError::StaleElement {
                id: handle.id.clone(),
            })
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl TackleDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> TackleResult<()> {
        debug!(url, "navigate");
        self.page
            .goto(url)
            .await
            .map_err(|e| TackleError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> TackleResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(driver_error)?
            .unwrap_or_default())
    }

    async fn query_all(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> TackleResult<Vec<ElementHandle>> {
        let sel = js(selector);
        match scope {
            Some(parent) => {
                let body =
                    format!("return __ok(Array.from(el.querySelectorAll({sel})).map(__snap));");
                self.eval(on_element(&parent.id, &body), &parent.id).await
            }
            None => {
                let script = format!(
                    "(() => {{ {PRELUDE} \
                     return __ok(Array.from(document.querySelectorAll({sel})).map(__snap)); }})()"
                );
                self.eval(script, "document").await
            }
        }
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> TackleResult<Option<ElementHandle>> {
        let body = format!(
            "const hit = el.closest({}); return __ok(hit ? __snap(hit) : null);",
            js(selector)
        );
        self.eval(on_element(&element.id, &body), &element.id).await
    }

    async fn next_sibling(&self, element: &ElementHandle) -> TackleResult<Option<ElementHandle>> {
        let body =
            "const next = el.nextElementSibling; return __ok(next ? __snap(next) : null);";
        self.eval(on_element(&element.id, body), &element.id).await
    }

    async fn refresh(&self, element: &ElementHandle) -> TackleResult<ElementHandle> {
        self.eval(on_element(&element.id, "return __ok(__snap(el));"), &element.id)
            .await
    }

    async fn click(&self, element: &ElementHandle, force: bool) -> TackleResult<()> {
        debug!(id = %element.id, force, "click");
        if force {
            let body = "el.click(); return __ok(true);";
            return self
                .eval::<bool>(on_element(&element.id, body), &element.id)
                .await
                .map(|_| ());
        }
        if self.refresh(element).await?.is_disabled() {
            return Err(TackleError::NotActionable {
                selector: element.id.clone(),
                reason: "element is disabled".to_string(),
            });
        }
        let target = self.element(element).await?;
        target
            .scroll_into_view()
            .await
            .map_err(driver_error)?
            .click()
            .await
            .map_err(|e| TackleError::NotActionable {
                selector: element.id.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> TackleResult<()> {
        let body = "const proto = Object.getPrototypeOf(el); \
            const setter = Object.getOwnPropertyDescriptor(proto, 'value'); \
            if (setter && setter.set) { setter.set.call(el, ''); } else { el.value = ''; } \
            el.dispatchEvent(new Event('input', { bubbles: true })); \
            return __ok(true);";
        self.eval::<bool>(on_element(&element.id, body), &element.id)
            .await
            .map(|_| ())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> TackleResult<()> {
        let target = self.element(element).await?;
        target
            .focus()
            .await
            .map_err(driver_error)?
            .type_str(text)
            .await
            .map_err(driver_error)?;
        Ok(())
    }

    async fn press_key(&self, element: &ElementHandle, key: Key) -> TackleResult<()> {
        let target = self.element(element).await?;
        target.press_key(key.name()).await.map_err(driver_error)?;
        Ok(())
    }

    async fn submit(&self, form: &ElementHandle) -> TackleResult<()> {
        let body = "if (el.requestSubmit) { el.requestSubmit(); } else { el.submit(); } \
            return __ok(true);";
        self.eval::<bool>(on_element(&form.id, body), &form.id)
            .await
            .map(|_| ())
    }

    async fn cookies(&self) -> TackleResult<Vec<Cookie>> {
        Ok(self
            .page
            .get_cookies()
            .await
            .map_err(driver_error)?
            .into_iter()
            .map(|c| Cookie {
                name: c.name,
                value: c.value,
                domain: Some(c.domain),
            })
            .collect())
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> TackleResult<()> {
        let params = cookies
            .iter()
            .map(|c| {
                let mut param = CookieParam::new(c.name.clone(), c.value.clone());
                param.domain.clone_from(&c.domain);
                param
            })
            .collect();
        self.page.set_cookies(params).await.map_err(driver_error)?;
        Ok(())
    }

    async fn clear_cookies(&self) -> TackleResult<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(driver_error)?;
        Ok(())
    }

    async fn close(&self) -> TackleResult<()> {
        info!("closing chromium");
        self.browser
            .lock()
            .await
            .close()
            .await
            .map_err(driver_error)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_quote_selectors() {
        let script = on_element("t7", "return __ok(true);");
        assert!(script.contains("__find(\"t7\")"));
        assert_eq!(js("td[data-label=\"Name\"]"), r#""td[data-label=\"Name\"]""#);
    }

    #[test]
    fn test_reply_shapes() {
        let ok: Reply<Option<ElementHandle>> =
            serde_json::from_str(r#"{"status":"ok","value":null}"#).unwrap();
        assert!(matches!(ok, Reply::Ok { value: None }));
        let stale: Reply<bool> = serde_json::from_str(r#"{"status":"stale"}"#).unwrap();
        assert!(matches!(stale, Reply::Stale));
    }
}
