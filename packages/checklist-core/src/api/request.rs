//! Request construction: URL joining, headers, JSON and multipart bodies.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Body carried by an [`ApiRequest`].
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A transport-independent description of one API call.
///
/// Requests are cheap to clone so the refresh coordinator can replay them
/// with a rotated token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Value of the `Content-Type` header this request will carry.
    pub fn content_type(&self) -> String {
        match &self.body {
            RequestBody::Multipart(form) => form.content_type(),
            RequestBody::Empty | RequestBody::Json(_) => JSON_CONTENT_TYPE.to_string(),
        }
    }

    /// Join `path` onto `base_url` and append the query string.
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw));
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Turn the description into a `reqwest` request ready to send.
    pub fn build(
        self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.url(base_url)?;
        let content_type = self.content_type();

        let mut builder = http.request(self.method, url);
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }

        let builder = match self.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, content_type),
            RequestBody::Json(value) => builder.header(CONTENT_TYPE, content_type).json(&value),
            RequestBody::Multipart(form) => builder
                .header(CONTENT_TYPE, content_type)
                .body(form.encode()),
        };

        Ok(builder)
    }
}

#[derive(Debug, Clone)]
struct FilePart {
    name: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Hand-assembled `multipart/form-data` body.
///
/// Text fields are written before file parts; the server does not rely on
/// part order.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("Boundary-{}", Uuid::new_v4()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(
        mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let file_bytes: usize = self.files.iter().map(|f| f.data.len()).sum();
        let mut body = Vec::with_capacity(file_bytes + 256 * (self.fields.len() + self.files.len() + 1));

        for (name, value) in &self.fields {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }

        for file in &self.files {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    file.name, file.filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
            body.extend_from_slice(&file.data);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}
