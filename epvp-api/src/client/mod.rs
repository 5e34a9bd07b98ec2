//! Forum HTTP client
//!
//! [`EpvpClient`] owns the connection pool, the cookie jar and the session
//! state. The operations are split by area into the submodules; they all go
//! through [`EpvpClient::send`], which checks the status and picks up the
//! security token of every page it sees.

mod auth;
mod messages;
mod sections;
mod shoutbox;
mod threads;
mod transactions;
mod treasures;
mod users;

use crate::error::{EpvpError, Result};
use crate::model::User;
use crate::parser;
use chrono::NaiveDate;
use reqwest::blocking::RequestBuilder;
use reqwest::cookie::Jar;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Token vBulletin expects from visitors without a session
const GUEST_TOKEN: &str = "guest";

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Login state shared by all clones of a client
#[derive(Debug, Default)]
struct SessionState {
    security_token: Option<String>,
    user: Option<User>,
}

/// A response body together with the URL it was finally served from
#[derive(Debug)]
struct Page {
    url: reqwest::Url,
    html: String,
}

/// The elitepvpers client
///
/// Clones share the cookie jar and the session, so a client can be logged in
/// once and handed to worker threads.
///
/// # Example
///
/// ```no_run
/// use epvp_api::{EpvpClient, Section};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EpvpClient::new()?;
///
/// // Listings and threads are readable as guest
/// let page = client.section_threads(&Section::new(206, "main"), 1)?;
/// for thread in &page.threads {
///     println!("{} ({} replies)", thread.title, thread.replies);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct EpvpClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    jar: Arc<Jar>,
    state: Arc<Mutex<SessionState>>,
}

impl EpvpClient {
    /// Create a client for `https://www.elitepvpers.com`
    ///
    /// # Errors
    ///
    /// Returns `EpvpError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use epvp_api::EpvpClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = EpvpClient::builder()
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> EpvpClientBuilder {
        EpvpClientBuilder::new()
    }

    /// Base URL all paths are resolved against
    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<reqwest::Url> {
        self.base_url
            .join(path)
            .map_err(|e| EpvpError::ClientInit(format!("Invalid path {}: {}", path, e)))
    }

    fn get(&self, path: &str) -> Result<Page> {
        let url = self.url(path)?;
        self.send(self.client.get(url))
    }

    /// Post a form and fail with the forum's message if it rejects it
    fn post_form<T: serde::Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<Page> {
        let url = self.url(path)?;
        let page = self.send(self.client.post(url).form(form))?;

        let document = scraper::Html::parse_document(&page.html);
        if let Some(message) = parser::error_message(&document) {
            log::debug!("form {} rejected: {}", path, message);
            return Err(EpvpError::Forum(message));
        }
        Ok(page)
    }

    /// Send a request, check its status and absorb the page's security token
    ///
    /// Transport errors are stripped of their URL, whose query may carry a
    /// secret.
    fn send(&self, request: RequestBuilder) -> Result<Page> {
        let request = request.build().map_err(reqwest::Error::without_url)?;
        log::debug!("{} {}", request.method(), request.url().path());

        let response = self
            .client
            .execute(request)
            .map_err(reqwest::Error::without_url)?;
        if !response.status().is_success() {
            return Err(EpvpError::InvalidStatus {
                status: response.status(),
            });
        }

        let url = response.url().clone();
        let html = response.text().map_err(|_| EpvpError::Encoding)?;

        if let Some(token) = parser::security_token(&html) {
            self.state().security_token = Some(token);
        }

        Ok(Page { url, html })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logged-in user and current security token, or `NotLoggedIn`
    fn require_login(&self) -> Result<(User, String)> {
        let state = self.state();
        match &state.user {
            Some(user) => Ok((
                user.clone(),
                state
                    .security_token
                    .clone()
                    .unwrap_or_else(|| GUEST_TOKEN.to_string()),
            )),
            None => Err(EpvpError::NotLoggedIn),
        }
    }

    /// Reference day for relative forum dates
    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Builder for configuring an [`EpvpClient`]
///
/// The cookie jar and the redirect policy are always installed by the
/// builder, whatever the custom client builder carries.
///
/// # Example
///
/// ```no_run
/// use epvp_api::EpvpClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EpvpClient::builder()
///     .base_url("http://localhost:1234")?
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct EpvpClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl EpvpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL, e.g. a mock server
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder (timeouts, proxies, user agent)
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    pub fn build(self) -> Result<EpvpClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse("https://www.elitepvpers.com")
                .map_err(|e| EpvpError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        let jar = Arc::new(Jar::default());
        let client = builder
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| EpvpError::ClientInit(e.to_string()))?;

        Ok(EpvpClient {
            client,
            base_url,
            jar,
            state: Arc::new(Mutex::new(SessionState::default())),
        })
    }
}

/// Client pointed at a mock server, shared by the client tests
#[cfg(test)]
pub(crate) fn test_client(server: &mockito::Server) -> EpvpClient {
    EpvpClient::builder()
        .base_url(server.url())
        .unwrap()
        .build()
        .unwrap()
}

/// Client that believes it is logged in as `Mostey` (#4759)
#[cfg(test)]
pub(crate) fn logged_in_client(server: &mockito::Server) -> EpvpClient {
    let client = test_client(server);
    {
        let mut state = client.state();
        state.user = Some(User::new(4759, "Mostey"));
        state.security_token = Some("1426339200-abcdef".to_string());
    }
    client
}
