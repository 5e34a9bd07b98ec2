//! elite*gold transactions API

use super::EpvpClient;
use crate::error::{EpvpError, Result};
use crate::model::{Transaction, TransactionFilter};

impl EpvpClient {
    /// elite*gold transactions of the logged-in member
    ///
    /// The API is authenticated by the secret word set in the member's
    /// Black Market settings, not by the session cookies.
    pub fn transactions(
        &self,
        filter: TransactionFilter,
        secret_word: &str,
    ) -> Result<Vec<Transaction>> {
        let (user, _) = self.require_login()?;
        if secret_word.is_empty() {
            return Err(EpvpError::InvalidArgument("secret word is empty".to_string()));
        }

        let mut url = self.url("theblackmarket/api/transactions.php")?;
        url.query_pairs_mut()
            .append_pair("u", &user.id.to_string())
            .append_pair("type", filter.as_query())
            .append_pair("secretword", secret_word);
        let response = self.send(self.client.get(url))?;

        let body: serde_json::Value = serde_json::from_str(&response.html)?;
        if let Some(error) = body.get("error") {
            let message = match error {
                serde_json::Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            return Err(EpvpError::Forum(message));
        }

        let transactions: Vec<Transaction> = serde_json::from_value(body)?;
        log::debug!("fetched {} transactions", transactions.len());
        Ok(transactions)
    }
}
