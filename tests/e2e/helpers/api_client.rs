use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const MULTIPART_BOUNDARY: &str = "----naija-tts-test-boundary";

/// One part of a multipart upload
pub enum MultipartField<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8] },
}

#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>>,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            base_url: base_url.to_string(),
            client,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, Vec::new(), None).await
    }

    pub async fn get_with_key(&self, path: &str, api_key: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, Vec::new(), Some(api_key.as_bytes()))
            .await
    }

    /// GET with an `x-api-key` header that need not be valid text
    pub async fn get_with_raw_key(&self, path: &str, api_key: &[u8]) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, Vec::new(), Some(api_key))
            .await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.post_json(path, body, None).await
    }

    pub async fn post_with_key<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        api_key: &str,
    ) -> Result<ApiResponse> {
        self.post_json(path, body, Some(api_key.as_bytes())).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<ApiResponse> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        self.send(
            Method::POST,
            path,
            Some("application/x-www-form-urlencoded".to_string()),
            body.into_bytes(),
            None,
        )
        .await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[MultipartField<'_>],
        api_key: Option<&str>,
    ) -> Result<ApiResponse> {
        let mut body = Vec::new();
        for field in fields {
            body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
            match field {
                MultipartField::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                MultipartField::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, filename, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        self.send(
            Method::POST,
            path,
            Some(format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)),
            body,
            api_key.map(str::as_bytes),
        )
        .await
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        api_key: Option<&[u8]>,
    ) -> Result<ApiResponse> {
        self.send(
            Method::POST,
            path,
            Some("application/json".to_string()),
            serde_json::to_vec(body)?,
            api_key,
        )
        .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: Option<String>,
        body: Vec<u8>,
        api_key: Option<&[u8]>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut req_builder = Request::builder().method(method).uri(&url);

        if let Some(key) = api_key {
            req_builder = req_builder.header("x-api-key", key);
        }
        if let Some(content_type) = content_type {
            req_builder = req_builder.header("Content-Type", content_type);
        }

        let request = req_builder.body(Full::new(Bytes::from(body)))?;
        let response = self.client.request(request).await?;

        ApiResponse::from_response(response).await
    }
}

/// Percent-encode a query or form component
pub fn encode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HashMap<String, String>,
}

#[allow(dead_code)]
impl ApiResponse {
    async fn from_response(response: Response<hyper::body::Incoming>) -> Result<Self> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();

        let body = if !body_bytes.is_empty() {
            serde_json::from_slice(&body_bytes).ok()
        } else {
            None
        };

        Ok(Self {
            status,
            body,
            body_bytes,
            headers,
        })
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {}. Body: {:?}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert that the error response contains the expected message
    pub fn assert_error_message(&self, expected_message: &str) -> &Self {
        let message = self
            .body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|m| m.as_str())
            .expect("Missing error field in error response");

        assert!(
            message.contains(expected_message),
            "Expected error message to contain '{}', but got '{}'",
            expected_message,
            message
        );
        self
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body_bytes)?)
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn assert_header(&self, name: &str, value: &str) -> &Self {
        let actual = self
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(actual, value, "Header '{}' value mismatch", name);
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Header '{}' not found",
            name
        );
        self
    }
}
