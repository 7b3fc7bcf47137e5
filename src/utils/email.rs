//! Credential notifications.
//!
//! New principals learn their login id and password through a [`Notifier`].
//! [`SmtpNotifier`] sends a real email; [`LogNotifier`] only records that a
//! notice would have gone out and is used when SMTP is disabled.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use schoolhub_config::EmailConfig;
use schoolhub_core::{AppError, Role};
use tracing::{info, instrument};

/// What a new principal needs to sign in for the first time.
#[derive(Clone)]
pub struct CredentialNotice {
    pub to: String,
    pub name: String,
    pub login_id: String,
    pub password: String,
    pub school_name: String,
    pub role: Role,
}

impl fmt::Debug for CredentialNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialNotice")
            .field("to", &self.to)
            .field("name", &self.name)
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .field("school_name", &self.school_name)
            .field("role", &self.role)
            .finish()
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), AppError>;
}

/// Picks the notifier for the configured email settings.
pub fn build_notifier(config: &EmailConfig) -> Arc<dyn Notifier> {
    if config.enabled {
        Arc::new(SmtpNotifier::new(config.clone()))
    } else {
        Arc::new(LogNotifier)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), AppError> {
        info!(
            to = %notice.to,
            login_id = %notice.login_id,
            role = notice.role.as_str(),
            school = %notice.school_name,
            "SMTP disabled, credential email not sent"
        );
        Ok(())
    }
}

pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn mailer(&self) -> Result<SmtpTransport, AppError> {
        if !self.config.has_credentials() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::internal_error(format!("Failed to create SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    fn text_body(&self, notice: &CredentialNotice) -> String {
        format!(
            "Hi {},\n\n\
             An account has been created for you at {} with the role {}.\n\n\
             User ID: {}\n\
             Password: {}\n\n\
             Sign in at {} and keep these details private.\n\n\
             Best regards,\n\
             {}",
            notice.name,
            notice.school_name,
            notice.role.as_str(),
            notice.login_id,
            notice.password,
            self.config.frontend_url,
            self.config.from_name
        )
    }

    fn html_body(&self, notice: &CredentialNotice) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Your {school} account</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="600" cellpadding="0" cellspacing="0" align="center" style="background-color: #ffffff; border-radius: 8px;">
        <tr>
            <td style="background-color: #2563EB; padding: 24px; text-align: center;">
                <h1 style="margin: 0; color: #ffffff; font-size: 24px;">{school}</h1>
            </td>
        </tr>
        <tr>
            <td style="padding: 32px; color: #333333; font-size: 16px; line-height: 1.5;">
                <p>Hi <strong>{name}</strong>,</p>
                <p>An account has been created for you with the role <strong>{role}</strong>.</p>
                <p>User ID: <strong>{login_id}</strong><br>Password: <strong>{password}</strong></p>
                <p><a href="{url}" style="color: #2563EB;">Sign in</a> and keep these details private.</p>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            school = notice.school_name,
            name = notice.name,
            role = notice.role.as_str(),
            login_id = notice.login_id,
            password = notice.password,
            url = self.config.frontend_url,
        )
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, notice), fields(to = %notice.to, role = notice.role.as_str()))]
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(notice
                .to
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(format!("Your {} account", notice.school_name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(self.text_body(notice)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(self.html_body(notice)),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = self.mailer()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!("Credential email sent");
        Ok(())
    }
}
