use crate::domain::entities::{IncomingNotification, NotificationId};
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::ports::{NotificationApi, SessionProvider};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 500;

/// Accepted shapes of the list endpoint's body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NotificationListBody {
    Bare(Vec<Value>),
    Envelope {
        #[serde(default)]
        notifications: Option<Vec<Value>>,
    },
}

/// NotificationApi backed by the helpdesk REST endpoints
pub struct HttpNotificationApi {
    base_url: Url,
    http_client: Client,
    session: Arc<dyn SessionProvider>,
}

impl HttpNotificationApi {
    /// `timeout` of `None` lets requests run for as long as the server takes
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionProvider>,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Internal(format!("Invalid notifications API URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Internal(format!(
                "Notifications API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
            session,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Internal(format!("Cannot extend URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn list_url(&self) -> ApiResult<Url> {
        self.endpoint(&["api", "notifications"])
    }

    fn mark_read_url(&self, id: &NotificationId) -> ApiResult<Url> {
        let id = id.to_string();
        self.endpoint(&["api", "notifications", &id, "read"])
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let message = match response.text().await {
        Ok(body) if body.len() > MAX_ERROR_BODY => {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            body[..cut].to_string()
        }
        Ok(body) => body,
        Err(_) => format!("HTTP {} error", status.as_u16()),
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Blank bodies and `null` both mean "no list".
/// Records that do not fit the notification shape are skipped one by one.
fn parse_list_body(body: &str) -> ApiResult<Option<Vec<IncomingNotification>>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let parsed: Option<NotificationListBody> = serde_json::from_str(body).map_err(|e| {
        ApiError::Decode(format!(
            "expected a notification list or {{\"notifications\": [...]}}: {}",
            e
        ))
    })?;

    let records = match parsed {
        Some(NotificationListBody::Bare(list)) => list,
        Some(NotificationListBody::Envelope {
            notifications: Some(list),
        }) => list,
        _ => return Ok(None),
    };

    let notifications = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match IncomingNotification::from_json(record) {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!("Skipping malformed notification at index {}: {}", index, e);
                None
            }
        })
        .collect();

    Ok(Some(notifications))
}

#[async_trait::async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn fetch_all(&self) -> ApiResult<Option<Vec<IncomingNotification>>> {
        let url = self.list_url()?;
        debug!("Fetching notifications from {}", url);

        let response = self.authorize(self.http_client.get(url)).send().await?;
        let body = check_status(response).await?.text().await?;
        parse_list_body(&body)
    }

    async fn mark_read(&self, id: &NotificationId) -> ApiResult<()> {
        let url = self.mark_read_url(id)?;
        debug!("Marking notification {} as read", id);

        let response = self.authorize(self.http_client.put(url)).send().await?;
        if let Err(e) = check_status(response).await {
            warn!("Server rejected mark-read for {}: {}", id, e);
            return Err(e);
        }
        Ok(())
    }
}
