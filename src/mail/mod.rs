/// Transactional email
///
/// Contact and proposal submissions are validated, formatted as HTML and handed
/// to an HTTP email API. The same mailer delivers password-reset links.

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use crate::html::{escape, escape_multiline};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A rendered message ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

fn required(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Loose plausibility check: one `@`, something before it, a dot after it
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><td style=\"padding:4px 12px 4px 0;font-weight:bold;vertical-align:top\">{}</td><td style=\"padding:4px 0\">{}</td></tr>",
        escape(label),
        escape_multiline(value)
    )
}

fn optional_row(label: &str, value: &Option<String>) -> String {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => row(label, value),
        None => String::new(),
    }
}

fn layout(heading: &str, rows: &str, body_label: &str, body: &str) -> String {
    format!(
        "<div style=\"font-family:Arial,sans-serif;color:#222\">\
<h2>{}</h2>\
<table>{}</table>\
<h3>{}</h3>\
<p>{}</p>\
</div>",
        escape(heading),
        rows,
        escape(body_label),
        escape_multiline(body)
    )
}

/// Contact form submission
#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> AppResult<()> {
        required("Name", &self.name)?;
        required("Message", &self.message)?;
        if !is_plausible_email(&self.email) {
            return Err(AppError::Validation(format!("'{}' is not a valid email address", self.email.trim())));
        }
        Ok(())
    }

    pub fn to_email(&self, inbox: &str) -> AppResult<OutgoingEmail> {
        self.validate()?;

        let rows = [
            row("Name", &self.name),
            row("Email", &self.email),
            optional_row("Phone", &self.phone),
            optional_row("Company", &self.company),
        ]
        .concat();

        Ok(OutgoingEmail {
            to: inbox.to_string(),
            reply_to: Some(self.email.trim().to_string()),
            subject: format!("New contact message from {}", self.name.trim()),
            html: layout("New contact form submission", &rows, "Message", &self.message),
        })
    }
}

/// Project proposal request
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Requested service, usually a subcategory label
    pub service: String,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    pub details: String,
}

impl ProposalSubmission {
    pub fn validate(&self) -> AppResult<()> {
        required("Name", &self.name)?;
        required("Service", &self.service)?;
        required("Project details", &self.details)?;
        if !is_plausible_email(&self.email) {
            return Err(AppError::Validation(format!("'{}' is not a valid email address", self.email.trim())));
        }
        Ok(())
    }

    pub fn to_email(&self, inbox: &str) -> AppResult<OutgoingEmail> {
        self.validate()?;

        let rows = [
            row("Name", &self.name),
            row("Email", &self.email),
            optional_row("Company", &self.company),
            optional_row("Phone", &self.phone),
            row("Service", &self.service),
            optional_row("Budget", &self.budget),
            optional_row("Timeline", &self.timeline),
        ]
        .concat();

        Ok(OutgoingEmail {
            to: inbox.to_string(),
            reply_to: Some(self.email.trim().to_string()),
            subject: format!("Proposal request: {} ({})", self.service.trim(), self.name.trim()),
            html: layout("New proposal request", &rows, "Project details", &self.details),
        })
    }
}

/// Password reset message for an admin
pub fn password_reset_email(to: &str, reset_url: &str, site_name: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        reply_to: None,
        subject: format!("Reset your {} admin password", site_name),
        html: format!(
            "<div style=\"font-family:Arial,sans-serif;color:#222\">\
<p>A password reset was requested for this address.</p>\
<p><a href=\"{url}\">Choose a new password</a></p>\
<p>The link expires in one hour. If you did not ask for it, ignore this email.</p>\
</div>",
            url = escape(reset_url)
        ),
    }
}

/// HTTP email API client
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Address that receives site submissions
    pub fn inbox(&self) -> &str {
        &self.config.inbox
    }

    /// Deliver one message through the provider
    pub async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Configuration("Email API key is not configured".to_string()))?;

        let mut payload = json!({
            "from": self.config.from,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
        });
        if let Some(reply_to) = &email.reply_to {
            payload["reply_to"] = json!(reply_to);
        }

        tracing::debug!("📧 Sending '{}' to {}", email.subject, email.to);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Email request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Email provider rejected message ({}): {}", status, body);
            return Err(AppError::External(format!("Email provider returned {}", status)));
        }

        tracing::info!("✅ Email sent: {}", email.subject);
        Ok(())
    }
}
