// hr-client/src/gateway.rs
// API 网关 - 单一 HTTP 客户端, Bearer 注入, 401 处理

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{Authenticator, SessionEvent, SessionStore};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{LoginRequest, LoginResponse};
use shared::error::ErrorBody;
use tokio::sync::broadcast;

/// Binary payload with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The one configured HTTP client every call goes through
///
/// 401 handling lives here and nowhere else: the session is cleared and a
/// [`SessionEvent::Expired`] is broadcast. Navigation is the listener's job.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiGateway {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Stream of session lifecycle events, including expiry
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Read synchronously from memory at send time
    fn auth_header(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {}", t))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(auth) = self.auth_header() {
            req = req.header(AUTHORIZATION, auth);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<Response> {
        let request = req.build()?;
        // the token this request was signed with, not whatever is current on return
        let bearer = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        let response = self.client.execute(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, timeout = e.is_timeout(), "Request failed");
        })?;
        self.handle_response(response, bearer.as_deref()).await
    }

    async fn handle_response(
        &self,
        response: Response,
        bearer: Option<&str>,
    ) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            let cleared = self.session.expire_if(bearer);
            tracing::debug!(url = %response.url(), cleared, "401 received");
            return Err(ClientError::SessionExpired);
        }

        let url = response.url().to_string();
        let text = response.text().await.unwrap_or_default();
        let message = ErrorBody::parse(&text);
        tracing::warn!(%url, status = status.as_u16(), message = ?message, "Server returned error");
        Err(ClientError::Server { status, message })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::json(response).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Self::json(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Self::json(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        Self::json(response).await
    }

    /// DELETE expecting an empty (204) body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn get_bytes(&self, path: &str) -> ClientResult<Binary> {
        let response = self
            .send(self.request(Method::GET, path).header(ACCEPT, "*/*"))
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(Binary {
            content_type,
            bytes,
        })
    }

    pub async fn put_bytes(&self, path: &str, body: Binary) -> ClientResult<()> {
        let content_type = body
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let req = self
            .request(Method::PUT, path)
            .header(CONTENT_TYPE, content_type)
            .body(body.bytes);
        self.send(req).await?;
        Ok(())
    }
}

#[async_trait]
impl Authenticator for ApiGateway {
    /// `POST /api/auth/login` without a bearer; a 401 here is bad
    /// credentials, not an expired session
    async fn authenticate(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Authentication);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: ErrorBody::parse(&text),
            });
        }
        Self::json(response).await
    }
}
