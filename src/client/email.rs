use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;
use crate::domain::DisplayName;
use crate::domain::EmailAddress;

/// A `"Name" <addr>` pair. Constructed from the parsed domain types, so a
/// malformed constant fails before a request is ever built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    pub name: String,
}

impl Address {
    pub fn new(
        email: &EmailAddress,
        name: &DisplayName,
    ) -> Self {
        Self {
            email: email.as_ref().to_string(),
            name: name.as_ref().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email: String,
    pub name: String,

    /// Free-form key/values echoed back in webhook events for this recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, String>>,
}

impl Recipient {
    pub fn new(
        email: &EmailAddress,
        name: &DisplayName,
    ) -> Self {
        Self {
            email: email.as_ref().to_string(),
            name: name.as_ref().to_string(),
            custom_fields: None,
        }
    }

    pub fn with_custom_fields(
        mut self,
        fields: HashMap<String, String>,
    ) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// One outbound submission, transactional or marketing; the service fans it
/// out per recipient. The `with_` methods follow the builder convention so
/// callsites read like the message they produce.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: Address,
    pub to: Vec<Recipient>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub track_opens: bool,
    pub track_clicks: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Analytics tags ("marketing", "promotional", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl EmailMessage {
    pub fn new(
        from: Address,
        subject: String,
    ) -> Self {
        Self {
            from,
            to: Vec::new(),
            subject,
            html_body: String::new(),
            text_body: String::new(),
            track_opens: false,
            track_clicks: false,
            headers: None,
            groups: None,
        }
    }

    pub fn with_recipient(
        mut self,
        recipient: Recipient,
    ) -> Self {
        self.to.push(recipient);
        self
    }

    pub fn with_bodies(
        mut self,
        html: String,
        text: String,
    ) -> Self {
        self.html_body = html;
        self.text_body = text;
        self
    }

    pub fn with_tracking(mut self) -> Self {
        self.track_opens = true;
        self.track_clicks = true;
        self
    }

    pub fn with_headers(
        mut self,
        headers: HashMap<String, String>,
    ) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_groups(
        mut self,
        groups: Vec<String>,
    ) -> Self {
        self.groups = Some(groups);
        self
    }
}

/// Per-recipient acknowledgement: the service accepts or rejects each
/// recipient independently, and each accepted one gets its own message id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAck {
    pub message_id: String,
    #[serde(default)]
    pub to: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub submitted_at: Option<i64>,
}

impl EspClient {
    /// Returns one acknowledgement per recipient, in submission order
    #[tracing::instrument(skip(self, body), fields(subject = %body.subject, recipients = body.to.len()))]
    pub async fn send_email(
        &self,
        body: &EmailMessage,
    ) -> Result<Vec<EmailAck>, ClientError> {
        let request = self
            .request(
                reqwest::Method::POST,
                "/subaccount/email",
                KeyScope::SubAccount,
            )
            .json(body);
        self.execute(request).await
    }
}
