#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use storefront_api::auth::{Claims, TokenService, ACCOUNT_COOKIE, STORE_COOKIE};
use storefront_api::config::AppConfig;
use storefront_api::router::app;
use storefront_api::state::AppState;

/// A server over a fresh in-memory database, bound to an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    client: reqwest::Client,
}

/// Status, JSON body and `Set-Cookie` headers of one response.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookies: Vec<String>,
}

impl Reply {
    /// Value of a cookie set (not cleared) by this response
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies.iter().find_map(|header| {
            let (pair, attrs) = header.split_once(';').unwrap_or((header.as_str(), ""));
            let (key, value) = pair.split_once('=')?;
            (key == name && !value.is_empty() && !attrs.contains("Max-Age=0"))
                .then(|| value.to_string())
        })
    }

    /// Whether this response tells the browser to drop `name`
    pub fn clears(&self, name: &str) -> bool {
        self.set_cookies
            .iter()
            .any(|header| header.starts_with(&format!("{}=;", name)) && header.contains("Max-Age=0"))
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = "integration-secret".to_string();
    config.security.hash_cost = 1;
    config.api.enable_request_logging = false;
    config
}

pub async fn spawn_app() -> Result<TestApp> {
    let config = test_config();
    let state = AppState::in_memory(&config)?;
    let router = app(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    })
}

/// Sign `claims` outside the server, with any key and lifetime.
pub fn mint(secret: &str, claims: Claims, ttl_hours: i64) -> Result<String> {
    let tokens = TokenService::new(secret, chrono::Duration::hours(1))?;
    Ok(tokens.issue(claims, chrono::Duration::hours(ttl_hours))?)
}

pub fn account_claims(account_id: i64) -> Claims {
    Claims {
        sub: account_id,
        user_id: Some(account_id),
        store_id: None,
        email: "a@x.com".to_string(),
        name: "A".to_string(),
        iat: 0,
        exp: 0,
    }
}

pub fn store_claims(store_id: i64, owner_id: i64) -> Claims {
    Claims {
        sub: store_id,
        user_id: Some(owner_id),
        store_id: Some(store_id),
        email: "a@x.com".to_string(),
        name: "S1".to_string(),
        iat: 0,
        exp: 0,
    }
}

pub fn account_cookie(token: &str) -> String {
    format!("{}={}", ACCOUNT_COOKIE, token)
}

pub fn store_cookie(token: &str) -> String {
    format!("{}={}", STORE_COOKIE, token)
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Result<Reply> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        Self::reply(request.send().await?).await
    }

    /// Send a body verbatim, for malformed-JSON cases
    pub async fn send_raw(&self, method: Method, path: &str, body: &'static str) -> Result<Reply> {
        let request = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Self::reply(request.send().await?).await
    }

    async fn reply(response: reqwest::Response) -> Result<Reply> {
        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(Reply {
            status,
            body,
            set_cookies,
        })
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Reply> {
        self.send(
            Method::POST,
            "/register",
            Some(json!({ "name": name, "email": email, "password": password, "address": "addr" })),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Reply> {
        self.send(
            Method::POST,
            "/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Register and log in; returns the account id and the `token` cookie value.
    pub async fn sign_up(&self, email: &str) -> Result<(i64, String)> {
        let registered = self.register("A", email, "p").await?;
        anyhow::ensure!(registered.status == StatusCode::CREATED, "register failed: {}", registered.body);

        let login = self.login(email, "p").await?;
        let token = login.cookie(ACCOUNT_COOKIE).context("login set no token cookie")?;
        let id = registered.data()["id"].as_i64().context("account has no id")?;
        Ok((id, token))
    }

    /// Create a store and fetch a store token for it.
    pub async fn open_store(&self, token: &str, name: &str) -> Result<(i64, String)> {
        let created = self
            .send(
                Method::POST,
                "/account/store",
                Some(json!({ "name": name, "description": "desc" })),
                Some(&account_cookie(token)),
            )
            .await?;
        anyhow::ensure!(created.status == StatusCode::CREATED, "create store failed: {}", created.body);
        let id = created.data()["id"].as_i64().context("store has no id")?;

        let read = self
            .send(
                Method::GET,
                &format!("/account/store?id={}", id),
                None,
                Some(&account_cookie(token)),
            )
            .await?;
        let store_token = read.cookie(STORE_COOKIE).context("no store_token cookie")?;
        Ok((id, store_token))
    }
}
