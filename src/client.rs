use crate::accounts::Accounts;
use crate::config::{Config, DEFAULT_TIMEOUT};
use crate::error::{Form3Error, RawResponse, ResponseError};
use crate::models::ErrorBody;
use log::{debug, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, Request, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Media type sent in `Accept` and, for requests with a body, `Content-Type`.
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";

const API_VERSION_SEGMENT: &str = "v1/";

/// Successful exchange with the API.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
    pub data: T,
}

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
}

impl Client {
    /// Create a client for `base_url` (`scheme://host:port`).
    ///
    /// The URL is normalized to end with `/v1/`. Pass `http` to control TLS,
    /// proxies or timeouts; otherwise a `reqwest::Client` with the default
    /// 10 second timeout is used.
    pub fn new(base_url: &str, http: Option<HttpClient>) -> Result<Self, Form3Error> {
        let base_url = normalize_base_url(base_url)?;
        let http = match http {
            Some(http) => http,
            None => http_client(DEFAULT_TIMEOUT)?,
        };

        info!("Initialized Form3 API client for {}", base_url);
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, Form3Error> {
        let http = http_client(config.timeout)?;
        Self::new(&config.base_url, Some(http))
    }

    /// Create a client from `FORM3_BASE_URL` with a default transport.
    pub fn from_env() -> Result<Self, Form3Error> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    /// Build a request without a body. `path` is resolved relative to the
    /// base URL and must not start with `/`.
    pub fn build_request(&self, method: Method, path: &str) -> Result<Request, Form3Error> {
        let url = self.resolve(path)?;
        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        Ok(request)
    }

    /// Build a request carrying `body` as compact JSON.
    pub fn build_json_request<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Request, Form3Error>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(Form3Error::Serialize)?;
        let mut request = self.build_request(method, path)?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        *request.body_mut() = Some(payload.into());
        Ok(request)
    }

    /// Send `request` and decode a successful JSON body into `T`.
    ///
    /// A body that does not decode yields [`Form3Error::Decode`], which still
    /// carries the status, headers and raw bytes of the response.
    pub async fn execute<T>(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, Form3Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request, cancel).await?;
        match serde_json::from_slice(&response.data) {
            Ok(data) => Ok(ApiResponse {
                status: response.status,
                headers: response.headers,
                url: response.url,
                data,
            }),
            Err(source) => Err(Form3Error::Decode {
                response: RawResponse {
                    status: response.status,
                    headers: response.headers,
                    body: response.data,
                },
                source,
            }),
        }
    }

    /// Send `request`, discarding any successful response body.
    pub async fn execute_unit(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<()>, Form3Error> {
        let response = self.send(request, cancel).await?;
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            url: response.url,
            data: (),
        })
    }

    async fn send(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<u8>>, Form3Error> {
        if cancel.is_cancelled() {
            return Err(Form3Error::Cancelled);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!("{} request to {}", method, url);

        // The body is read in full here, so the connection is released on
        // every exit path once `response` is consumed or dropped.
        let exchange = async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let final_url = response.url().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, final_url, body.to_vec()))
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Form3Error::Cancelled),
            outcome = exchange => outcome,
        };
        let (status, headers, final_url, body) =
            outcome.map_err(|err| transport_error(err, cancel))?;
        debug!("Received status {}", status);

        check_response(status, &method, &url, &body)?;
        Ok(ApiResponse {
            status,
            headers,
            url: final_url,
            data: body,
        })
    }

    fn resolve(&self, path: &str) -> Result<Url, Form3Error> {
        if path.starts_with('/') {
            return Err(Form3Error::AbsolutePath(path.to_string()));
        }
        self.base_url
            .join(path)
            .map_err(|source| Form3Error::InvalidPath {
                path: path.to_string(),
                source,
            })
    }
}

/// A transport failure observed after the token fired is reported as
/// cancellation.
fn transport_error(err: reqwest::Error, cancel: &CancellationToken) -> Form3Error {
    if cancel.is_cancelled() {
        Form3Error::Cancelled
    } else {
        Form3Error::Http(err)
    }
}

fn http_client(timeout: Duration) -> Result<HttpClient, Form3Error> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(Form3Error::HttpClient)
}

/// Classify a response: statuses in 200..=299 pass, anything else becomes a
/// [`ResponseError`] whose message is taken from the body.
pub fn check_response(
    status: StatusCode,
    method: &Method,
    url: &Url,
    body: &[u8],
) -> Result<(), ResponseError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ResponseError {
        status,
        method: method.clone(),
        url: url.clone(),
        message: error_message(body),
    })
}

fn error_message(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }
    match serde_json::from_slice::<Option<ErrorBody>>(body) {
        Ok(parsed) => parsed
            .and_then(|parsed| parsed.error_message)
            .unwrap_or_default(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, Form3Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Form3Error::MissingBaseUrl(crate::config::BASE_URL_ENV));
    }
    let mut url = Url::parse(trimmed).map_err(|source| Form3Error::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(Form3Error::InvalidBaseUrl {
            url: trimmed.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }

    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    if !path.ends_with("/v1/") {
        path.push_str(API_VERSION_SEGMENT);
    }
    url.set_path(&path);
    Ok(url)
}
