//! Login, logout and session restoration

use super::{EpvpClient, GUEST_TOKEN, SessionState};
use crate::error::{EpvpError, Result};
use crate::model::User;
use crate::parser;
use md5::{Digest, Md5};
use zeroize::{Zeroize, Zeroizing};

/// Notice vBulletin renders for a rejected password
const INVALID_LOGIN_NOTICE: &str = "invalid username or password";

impl EpvpClient {
    /// Log in with a username and a plain text password
    ///
    /// The password never leaves the process; the forum receives its MD5
    /// digest like the browser login form sends it.
    ///
    /// # Errors
    ///
    /// * `EpvpError::InvalidCredentials` - the forum rejected the login
    /// * `EpvpError::Forum` - another error page, e.g. the failed login quota
    ///
    /// # Example
    ///
    /// ```no_run
    /// use epvp_api::EpvpClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = EpvpClient::new()?;
    /// let me = client.login("Mostey", "hunter2")?;
    /// assert!(client.is_logged_in());
    /// println!("Logged in as {}", me);
    /// # Ok(())
    /// # }
    /// ```
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let digest = Zeroizing::new(md5_hex(password));
        self.login_md5(username, &digest)
    }

    /// Log in with the lower-hex MD5 digest of the password
    pub fn login_md5(&self, username: &str, md5_password: &str) -> Result<User> {
        if md5_password.len() != 32 || !md5_password.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EpvpError::InvalidArgument(
                "password digest must be 32 hex characters".to_string(),
            ));
        }
        let digest = Zeroizing::new(md5_password.to_ascii_lowercase());

        let form = [
            ("vb_login_username", username),
            ("vb_login_password", ""),
            ("vb_login_md5password", digest.as_str()),
            ("vb_login_md5password_utf", digest.as_str()),
            ("cookieuser", "1"),
            ("s", ""),
            ("securitytoken", GUEST_TOKEN),
            ("do", "login"),
        ];
        let url = self.url("forum/login.php?do=login")?;
        let page = self.send(self.client.post(url).form(&form))?;

        let document = scraper::Html::parse_document(&page.html);
        if let Some(message) = parser::error_message(&document) {
            if message.to_lowercase().contains(INVALID_LOGIN_NOTICE) {
                log::info!("login rejected for {}", username);
                return Err(EpvpError::InvalidCredentials);
            }
            return Err(EpvpError::Forum(message));
        }

        let user = self.verify_session()?.ok_or(EpvpError::InvalidCredentials)?;
        log::info!("logged in as {} (#{})", user.name, user.id);
        Ok(user)
    }

    /// Resume a session from a `Cookie` header value
    ///
    /// The header is split into `name=value` pairs (`bbsessionhash`,
    /// `bbuserid`, `bbpassword`, ...) that are stored in the cookie jar before
    /// the session is verified. Returns `None` when the forum treats the
    /// visitor as a guest.
    pub fn restore_session(&self, cookie_header: &str) -> Result<Option<User>> {
        for pair in cookie_header.split(';').map(str::trim) {
            if pair.is_empty() {
                continue;
            }
            if !pair.contains('=') {
                return Err(EpvpError::InvalidArgument(
                    "cookies must be name=value pairs".to_string(),
                ));
            }
            let mut cookie = format!("{}; Path=/", pair);
            self.jar.add_cookie_str(&cookie, &self.base_url);
            cookie.zeroize();
        }

        let user = self.verify_session()?;
        match &user {
            Some(user) => log::info!("restored session of {} (#{})", user.name, user.id),
            None => log::info!("restored cookies belong to a guest session"),
        }
        Ok(user)
    }

    /// Check who the current cookies belong to
    ///
    /// Fetches the user control panel, refreshing the security token and
    /// the logged-in user. Returns `None` for guests.
    pub fn verify_session(&self) -> Result<Option<User>> {
        let page = self.get("forum/usercp.php")?;
        let document = scraper::Html::parse_document(&page.html);
        let user = parser::logged_in_user(&document);

        let mut state = self.state();
        state.user = user.clone();
        if user.is_none() {
            state.security_token = None;
        }
        Ok(user)
    }

    /// End the session on the forum and forget it locally
    pub fn logout(&self) -> Result<()> {
        let (user, token) = self.require_login()?;

        let mut url = self.url("forum/login.php")?;
        url.query_pairs_mut()
            .append_pair("do", "logout")
            .append_pair("logouthash", &token);
        self.send(self.client.get(url))?;

        *self.state() = SessionState::default();
        log::info!("logged out {} (#{})", user.name, user.id);
        Ok(())
    }

    /// The logged-in user, None for guests
    pub fn current_user(&self) -> Option<User> {
        self.state().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state().user.is_some()
    }

    /// Security token of the most recent page, `guest` without a session
    pub fn security_token(&self) -> String {
        self.state()
            .security_token
            .clone()
            .unwrap_or_else(|| GUEST_TOKEN.to_string())
    }
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}
