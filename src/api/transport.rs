use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Url};

use super::{ApiError, ApiRequest, ApiResponse, FormField, Method, RequestBody, Transport};

/// HTTP transport backed by `reqwest`.
///
/// Only the connect phase is bounded; an accepted request that never answers
/// stays pending.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

/// Parse the server root every request and link is built from.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).with_context(|| format!("invalid base url '{base_url}'"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("base url '{url}' cannot carry a path");
    }
    Ok(url)
}

/// Append `segments` to `base`, percent-encoding each one.
pub(crate) fn join_segments<S: AsRef<str>>(base: &Url, segments: &[S]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty()
            .extend(segments.iter().map(|segment| segment.as_ref()));
    }
    url
}

impl ReqwestTransport {
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, request: &ApiRequest) -> Url {
        let mut url = join_segments(&self.base_url, &request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }
}

fn multipart_form(fields: Vec<FormField>) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name, value),
            FormField::File { name, file } => {
                let part = multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|err| ApiError::Network(format!("invalid content type: {err}")))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(&request);
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Multipart(fields) => builder.multipart(multipart_form(fields)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}
