use crate::client::Client;
use crate::error::Form3Error;
use crate::models::{Account, Resource, ResourceList};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, Request};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

/// Path of the account collection, relative to the versioned base URL.
pub const ACCOUNTS_PATH: &str = "organisation/accounts";

/// Operations on the organisation accounts resource.
///
/// Every call is a single request. Nothing is retried and nothing is
/// validated locally; the server enforces mandatory attributes and
/// version matching.
#[async_trait]
pub trait AccountOperations: Send + Sync {
    /// Register an account. `attributes.country` must be set.
    async fn create(
        &self,
        account: &Account,
        cancel: &CancellationToken,
    ) -> Result<Account, Form3Error>;

    /// Fetch one account. A missing account is a response error with
    /// status 404.
    async fn fetch(
        &self,
        account_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, Form3Error>;

    /// List one page of accounts. Page parameters are passed through as is.
    async fn list(
        &self,
        page_number: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Account>, Form3Error>;

    /// Delete an account at the given version.
    async fn delete(
        &self,
        account_id: &str,
        version: u64,
        cancel: &CancellationToken,
    ) -> Result<(), Form3Error>;
}

/// [`AccountOperations`] over HTTP, borrowed from a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a Client,
}

impl<'a> Accounts<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn account_request(&self, method: Method, account_id: &str) -> Result<Request, Form3Error> {
        self.client.build_request(method, &account_path(account_id))
    }
}

#[async_trait]
impl AccountOperations for Accounts<'_> {
    async fn create(
        &self,
        account: &Account,
        cancel: &CancellationToken,
    ) -> Result<Account, Form3Error> {
        debug!("Creating account {}", account.id);
        let request =
            self.client
                .build_json_request(Method::POST, ACCOUNTS_PATH, &Resource::new(account))?;
        let response = self
            .client
            .execute::<Resource<Account>>(request, cancel)
            .await?;
        Ok(response.data.into_inner())
    }

    async fn fetch(
        &self,
        account_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, Form3Error> {
        debug!("Fetching account {}", account_id);
        let request = self.account_request(Method::GET, account_id)?;
        let response = self
            .client
            .execute::<Resource<Account>>(request, cancel)
            .await?;
        Ok(response.data.into_inner())
    }

    async fn list(
        &self,
        page_number: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Account>, Form3Error> {
        debug!("Listing accounts page={} size={}", page_number, page_size);
        let mut request = self.client.build_request(Method::GET, ACCOUNTS_PATH)?;
        // Brackets stay literal on the wire, as the API documents them.
        request.url_mut().set_query(Some(&format!(
            "page[number]={}&page[size]={}",
            page_number, page_size
        )));
        let response = self
            .client
            .execute::<ResourceList<Account>>(request, cancel)
            .await?;
        Ok(response.data.into_inner())
    }

    async fn delete(
        &self,
        account_id: &str,
        version: u64,
        cancel: &CancellationToken,
    ) -> Result<(), Form3Error> {
        debug!("Deleting account {} at version {}", account_id, version);
        let mut request = self.account_request(Method::DELETE, account_id)?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("version", &version.to_string());
        self.client.execute_unit(request, cancel).await?;
        Ok(())
    }
}

/// `organisation/accounts/{id}`, with the id encoded as one path segment.
fn account_path(account_id: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(account_id.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{}/{}", ACCOUNTS_PATH, encoded)
}
