use base64::Engine;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::abilities::AbilityDescriptor;
use crate::config::{BridgeConfig, PLUGIN_NAMESPACE};
use crate::error::BridgeError;

/// `Basic base64(user:pass)` when both halves are configured.
pub fn basic_auth_header(config: &BridgeConfig) -> Option<String> {
    match (config.username.as_deref(), config.app_password.as_deref()) {
        (Some(user), Some(pass)) => {
            let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            Some(format!("Basic {token}"))
        }
        _ => None,
    }
}

/// HTTP client for both invocation paths of the target service.
#[derive(Clone)]
pub struct AbilitiesClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<HeaderValue>,
}

impl AbilitiesClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BridgeError::InvalidBaseUrl(config.base_url.clone()));
        }
        let auth = basic_auth_header(config)
            .map(|h| HeaderValue::from_str(&h))
            .transpose()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("forms-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, BridgeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BridgeError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `/wp-json/wp-abilities/v1/abilities/{name}/run`; the `/` inside the
    /// ability name is percent-encoded as part of its segment.
    pub fn ability_url(&self, ability: &str) -> Result<Url, BridgeError> {
        self.endpoint(["wp-json", "wp-abilities", "v1", "abilities", ability, "run"])
    }

    pub fn fallback_url(&self, route: &str) -> Result<Url, BridgeError> {
        self.endpoint(["wp-json", PLUGIN_NAMESPACE, "v1", route])
    }

    /// Primary path: the capability-invocation endpoint.
    pub async fn run_ability(&self, ability: &str, input: &Value) -> Result<Value, BridgeError> {
        let url = self.ability_url(ability)?;
        self.post_json(url, input, format!("Ability run failed: {ability}"))
            .await
    }

    /// Secondary path: the descriptor's legacy route.
    pub async fn run_fallback(
        &self,
        descriptor: &AbilityDescriptor,
        input: &Value,
    ) -> Result<Value, BridgeError> {
        let url = self.fallback_url(descriptor.route)?;
        self.post_json(
            url,
            input,
            format!("Fallback run failed: {}", descriptor.tool_name),
        )
        .await
    }

    async fn post_json(
        &self,
        url: Url,
        input: &Value,
        context: String,
    ) -> Result<Value, BridgeError> {
        debug!(%url, "POST");
        let mut req = self.http.post(url).json(input);
        if let Some(auth) = &self.auth {
            req = req.header(AUTHORIZATION, auth.clone());
        }
        let resp = req.send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        let body = decode_body(&text);

        if !status.is_success() {
            let message = error_message(body.as_ref()).unwrap_or_else(|| {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string()
            });
            return Err(BridgeError::Transport { context, message });
        }

        Ok(body.unwrap_or(Value::Null))
    }
}

/// `None` for an empty body; text that is not JSON is kept as `{"raw": text}`.
fn decode_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text })))
}

/// The body's `message`, else its `code`, ignoring empty values.
fn error_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    ["message", "code"].iter().find_map(|key| match body.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Null) | Some(Value::Bool(false)) | None => None,
        Some(Value::String(_)) => None,
        Some(other) => Some(other.to_string()),
    })
}
