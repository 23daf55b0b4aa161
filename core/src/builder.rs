//! Turns call arguments into a `RequestDescriptor`.

use serde::Serialize;
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::NetworkError;
use crate::header::{CustomHeaders, HeaderName};
use crate::http::{HttpMethod, RequestDescriptor};

const JSON: &str = "application/json";

/// Build a transport-ready request.
///
/// The URL is validated before anything else. Defaults (`Content-Type`,
/// `Accept`, the token header) are set first and `custom_headers` are
/// applied on top, so a custom header can override a default. `body` is
/// only encoded for methods that carry one.
pub fn build_request<B>(
    url: &str,
    method: HttpMethod,
    token: Option<&str>,
    custom_headers: &CustomHeaders,
    body: Option<&B>,
    config: &ConnectionConfig,
) -> Result<RequestDescriptor, NetworkError>
where
    B: Serialize + ?Sized,
{
    let parsed = Url::parse(url).map_err(|_| NetworkError::InvalidUrl {
        url: url.to_string(),
    })?;

    let mut request = RequestDescriptor::new(method, parsed);
    request.set_header(HeaderName::ContentType.as_str(), JSON);
    request.set_header(HeaderName::Accept.as_str(), JSON);

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        request.set_header(
            config.token_header.header_name().as_str(),
            format!("Bearer {token}"),
        );
    }

    for (name, value) in custom_headers {
        request.set_header(name.as_str(), value.as_str());
    }

    if method.has_body() {
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| NetworkError::Serialization {
                details: e.to_string(),
            })?;
            request.body = Some(bytes);
        }
    }

    Ok(request)
}
