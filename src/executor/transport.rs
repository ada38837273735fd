//! Transport abstraction layer.
//!
//! [`Transport`] is the seam between the executor and the network, so tests
//! and embedders can swap in their own implementation. [`ReqwestTransport`]
//! is the default one.

use super::encoding::encode_parameters;
use super::types::{TransportOptions, TransportResponse};
use crate::error::TransportError;
use crate::parser::{CurlRequest, HttpMethod};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_TYPE};
use reqwest::{redirect, Client, ClientBuilder, Method, Proxy};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use url::Url;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 20;

/// Content codings the client can decode.
const DECODABLE_ENCODINGS: &[&str] = &["gzip", "deflate", "br", "zstd", "identity", "*"];

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;

/// Performs the network exchange described by a [`CurlRequest`].
pub trait Transport: Send + Sync {
    /// Sends `request` and resolves once the whole response body is read.
    ///
    /// Implementations must apply the request's proxy to this call only.
    fn send<'a>(&'a self, request: &'a CurlRequest) -> TransportFuture<'a>;
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Connect => Method::CONNECT,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Trace => Method::TRACE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

/// reqwest-backed transport.
///
/// Requests without a proxy share one client. A request with a proxy gets a
/// client of its own, so proxy settings never leak between calls.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    options: TransportOptions,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> Result<Self, TransportError> {
        let client = client_builder(&options)
            .build()
            .map_err(|e| TransportError::from_reqwest(e, false))?;
        Ok(Self { client, options })
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<Client, TransportError> {
        let Some(proxy) = proxy else {
            return Ok(self.client.clone());
        };

        // Only plain-http targets go through the proxy.
        let proxy = Proxy::http(proxy)
            .map_err(|e| TransportError::Proxy(format!("invalid proxy {}: {}", proxy, e)))?;
        client_builder(&self.options)
            .proxy(proxy)
            .build()
            .map_err(|e| TransportError::Proxy(format!("failed to configure proxy: {}", e)))
    }

    async fn send_request(
        &self,
        request: &CurlRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| {
            TransportError::InvalidRequest(format!("invalid URL {}: {}", request.url, e))
        })?;
        let via_proxy = request.proxy.is_some() && url.scheme() == "http";
        let client = self.client_for(request.proxy.as_deref())?;

        let encoded = encode_parameters(
            request.method,
            url,
            &request.parameters,
            request.header("content-type").is_some(),
        );

        let mut builder = client.request(request.method.into(), encoded.url);
        for (key, value) in &request.headers {
            let value = if key.eq_ignore_ascii_case(ACCEPT_ENCODING.as_str()) {
                match supported_accept_encoding(value) {
                    Some(filtered) => filtered,
                    None => {
                        tracing::debug!(value = %value, "Dropping undecodable Accept-Encoding");
                        continue;
                    }
                }
            } else {
                value.clone()
            };
            match (HeaderName::from_str(key), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => builder = builder.header(name, value),
                _ => tracing::warn!(header = %key, "Skipping header that cannot be sent"),
            }
        }
        if let Some(content_type) = encoded.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = encoded.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, via_proxy))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, via_proxy))?
            .to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(&'a self, request: &'a CurlRequest) -> TransportFuture<'a> {
        Box::pin(self.send_request(request))
    }
}

/// Keeps only the codings of an `Accept-Encoding` value that the client can
/// decode, so the server never answers with a body that would be unreadable.
/// Returns `None` when nothing is left.
fn supported_accept_encoding(value: &str) -> Option<String> {
    let kept: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|coding| {
            let name = coding.split(';').next().unwrap_or("").trim();
            DECODABLE_ENCODINGS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(name))
        })
        .collect();
    (!kept.is_empty()).then(|| kept.join(", "))
}

/// System proxy detection is disabled: the only proxy a request uses is the
/// one its command named.
fn client_builder(options: &TransportOptions) -> ClientBuilder {
    Client::builder()
        .no_proxy()
        .timeout(options.timeout)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
}
