//! HTTP implementation of the compose backend

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    domain::communication::{
        accounts::{EmailLinked, SubscriptionPlan},
        backend::{BackendError, ComposeBackend, ScheduledEmailRequest, SendEmailRequest},
        recipients::Recipient,
    },
    infrastructure::api::ApiConfig,
};

const SEND_EMAIL: &str = "user/social_api/send_email/";
const SEND_SCHEDULED_EMAIL: &str = "user/social_api/send_schedule_email/";
const USER_DESCRIPTION: &str = "user/social_api/get_user_description/";
const PLAN: &str = "user/preferences/plan/";
const CONTACTS: &str = "user/contacts/";
const EMAILS_LINKED: &str = "user/emails_linked/";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SendOutcome {
    success: Option<bool>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DescriptionBody {
    #[serde(alias = "description")]
    data: Option<String>,
}

/// Client for the product's REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .context("access token is not a valid header value")?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, BackendError> {
        debug!(endpoint, "backend request");

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(anyhow!(e).context(format!("{endpoint} failed"))))?;

        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .map(error_text);

        warn!(endpoint, status = status.as_u16(), ?message, "backend rejected request");

        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, BackendError> {
        let response = self.execute(endpoint, self.http.get(self.url(endpoint))).await?;

        decode(response).await
    }

    fn multipart(request: &SendEmailRequest) -> Result<Form, BackendError> {
        let mut form = Form::new()
            .text("subject", request.subject.clone())
            .text("message", request.message.clone())
            .text("email", request.email.clone());

        // The provider views read blind copies from `cci`.
        let lists = [
            ("to", Some(&request.to)),
            ("cc", request.cc.as_ref()),
            ("bcc", request.bcc.as_ref()),
            ("cci", request.bcc.as_ref()),
        ];

        for (name, addresses) in lists {
            for address in addresses.into_iter().flatten() {
                form = form.text(name, address.clone());
            }
        }

        for attachment in &request.attachments {
            let mut part = Part::bytes(attachment.content.clone()).file_name(attachment.name.clone());

            if let Some(content_type) = &attachment.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| BackendError::Transport(e.into()))?;
            }

            form = form.part("attachments", part);
        }

        Ok(form)
    }
}

fn error_text(error: Value) -> String {
    match error {
        Value::String(message) => message,
        other => other.to_string(),
    }
}

/// A 2xx reply to a send can still carry `"success": false`.
async fn ensure_sent(endpoint: &str, response: Response) -> Result<(), BackendError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| BackendError::Transport(e.into()))?;

    match serde_json::from_str::<SendOutcome>(&body) {
        Ok(SendOutcome {
            success: Some(false),
            error,
        }) => {
            let message = error.map(error_text);

            warn!(endpoint, status, ?message, "backend reported a failed send");

            Err(BackendError::Rejected { status, message })
        }
        _ => Ok(()),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.into()))
}

#[async_trait]
impl ComposeBackend for ApiClient {
    async fn send_email(&self, request: &SendEmailRequest) -> Result<(), BackendError> {
        let builder = self
            .http
            .post(self.url(SEND_EMAIL))
            .header("email", &request.email)
            .multipart(Self::multipart(request)?);

        let response = self.execute(SEND_EMAIL, builder).await?;

        ensure_sent(SEND_EMAIL, response).await
    }

    async fn send_scheduled_email(
        &self,
        request: &ScheduledEmailRequest,
    ) -> Result<(), BackendError> {
        let builder = self
            .http
            .post(self.url(SEND_SCHEDULED_EMAIL))
            .header("email", &request.message.email)
            .json(request);

        let response = self.execute(SEND_SCHEDULED_EMAIL, builder).await?;

        ensure_sent(SEND_SCHEDULED_EMAIL, response).await
    }

    async fn get_user_description(&self, email: &str) -> Result<String, BackendError> {
        let builder = self
            .http
            .post(self.url(USER_DESCRIPTION))
            .json(&json!({ "email": email }));

        let response = self.execute(USER_DESCRIPTION, builder).await?;
        let body: DescriptionBody = decode(response).await?;

        Ok(body.data.unwrap_or_default())
    }

    async fn get_plan(&self) -> Result<SubscriptionPlan, BackendError> {
        self.get(PLAN).await
    }

    async fn get_contacts(&self) -> Result<Vec<Recipient>, BackendError> {
        self.get(CONTACTS).await
    }

    async fn get_emails_linked(&self) -> Result<Vec<EmailLinked>, BackendError> {
        self.get(EMAILS_LINKED).await
    }
}
