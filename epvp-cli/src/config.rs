//! Configuration resolution from CLI args and environment

use crate::cli::Args;
use crate::error::CliError;
use epvp_api::{EpvpClient, User};
use std::time::Duration;
use zeroize::Zeroizing;

const USERNAME_VAR: &str = "EPVP_USERNAME";
const PASSWORD_VAR: &str = "EPVP_PASSWORD";
const SECRET_WORD_VAR: &str = "EPVP_SECRET_WORD";

/// Resolved runtime configuration
pub struct Config {
    /// Forum base URL (None = elitepvpers.com)
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Number of threads for parallel fetches
    pub thread_count: usize,
    /// Account name, if known up front
    pub username: Option<String>,
    /// Password from the environment (zeroized on drop)
    pub password: Option<Zeroizing<String>>,
    /// Black Market API secret word from the environment (zeroized on drop)
    pub secret_word: Option<Zeroizing<String>>,
    /// JSON output
    pub json: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args and the process environment
    pub fn from_args(args: &Args) -> Result<Self, CliError> {
        Self::resolve(args, |name| std::env::var(name).ok())
    }

    fn resolve(args: &Args, env: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let thread_count = match args.threads {
            Some(0) => return Err(CliError::Config("--threads must be at least 1".to_string())),
            Some(n) => n,
            None => num_cpus(),
        };
        if args.timeout == 0 {
            return Err(CliError::Config("--timeout must be at least 1 second".to_string()));
        }

        let username = args
            .username
            .clone()
            .or_else(|| env(USERNAME_VAR))
            .filter(|name| !name.trim().is_empty());

        Ok(Config {
            base_url: args.base_url.clone(),
            timeout: Duration::from_secs(args.timeout),
            thread_count,
            username,
            password: env(PASSWORD_VAR).filter(|p| !p.is_empty()).map(Zeroizing::new),
            secret_word: env(SECRET_WORD_VAR)
                .filter(|s| !s.is_empty())
                .map(Zeroizing::new),
            json: args.json,
            quiet: args.quiet,
        })
    }

    /// Build the forum client
    pub fn client(&self) -> Result<EpvpClient, CliError> {
        let mut builder = EpvpClient::builder().client_builder(
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(concat!("epvp-cli/", env!("CARGO_PKG_VERSION")))
                .use_rustls_tls(),
        );
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.as_str())?;
        }
        Ok(builder.build()?)
    }

    /// Log the client in, prompting for whatever the environment lacks
    pub fn login(&self, client: &EpvpClient) -> Result<User, CliError> {
        let username = match &self.username {
            Some(name) => name.clone(),
            None => prompt_line("Username: ")?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_secret(&format!("Password for {}: ", username))?,
        };

        let user = client.login(&username, &password)?;
        log::info!("logged in as {} (#{})", user.name, user.id);
        Ok(user)
    }

    /// Secret word for the transactions API
    pub fn secret_word(&self) -> Result<Zeroizing<String>, CliError> {
        match &self.secret_word {
            Some(secret) => Ok(secret.clone()),
            None => prompt_secret("Black Market secret word: "),
        }
    }
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn prompt_line(prompt: &str) -> Result<String, CliError> {
    use std::io::Write;
    print!("{}", prompt);
    std::io::stdout().flush().ok();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim().to_string();
    if input.is_empty() {
        return Err(CliError::Config("Username is required.".to_string()));
    }
    Ok(input)
}

fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>, CliError> {
    let secret = Zeroizing::new(
        rpassword::prompt_password(prompt)
            .map_err(|e| CliError::Config(format!("Failed to read secret: {}", e)))?,
    );
    if secret.is_empty() {
        return Err(CliError::Config("A non-empty value is required.".to_string()));
    }
    Ok(secret)
}
