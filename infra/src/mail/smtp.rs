//! SMTP mailer implementation

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use sg_core::services::otp::OtpMailer;
use sg_core::services::reset::ResetMailer;
use sg_shared::config::smtp::SmtpConfig;
use sg_shared::utils::email;

use crate::InfrastructureError;

/// SMTP delivery gateway for OTP and password-reset mail
///
/// Sends are synchronous from the engines' perspective: a slow or failing
/// relay directly slows or fails the triggering call, which is what lets
/// the reset engine unwind on delivery failure.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Build a mailer over a TLS relay connection
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| InfrastructureError::Mail(format!("invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        info!("SMTP mailer configured for relay {}:{}", config.host, config.port);
        Ok(Self { transport, config })
    }

    /// Build a mailer from `SMTP_*` environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let config = SmtpConfig::from_env().map_err(InfrastructureError::Config)?;
        Self::new(config)
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        text: String,
        html: String,
    ) -> Result<(), String> {
        let from = self
            .config
            .from
            .parse::<Mailbox>()
            .map_err(|e| format!("invalid from address: {}", e))?;
        let to_mailbox = to
            .parse::<Mailbox>()
            .map_err(|e| format!("invalid recipient: {}", e))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| format!("build message: {}", e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("smtp send: {}", e))?;

        debug!(to = %email::mask(to), "message accepted by relay");
        Ok(())
    }
}

#[async_trait]
impl OtpMailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str, app_name: &str) -> Result<(), String> {
        let minutes = ttl_minutes(self.config.otp_ttl);
        self.send(
            to,
            &self.config.otp_subject,
            otp_text_body(code, minutes),
            otp_html_body(app_name, code, minutes),
        )
        .await
    }
}

#[async_trait]
impl ResetMailer for SmtpMailer {
    async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        app_name: &str,
        reset_url: &str,
        ttl: Duration,
    ) -> Result<(), String> {
        let minutes = ttl_minutes(ttl);
        self.send(
            to,
            &self.config.reset_subject,
            reset_text_body(token, reset_url, minutes),
            reset_html_body(app_name, token, reset_url, minutes),
        )
        .await
    }
}

/// TTL rendered as whole minutes for message bodies, at least 1
fn ttl_minutes(ttl: Duration) -> u64 {
    (ttl.as_secs() / 60).max(1)
}

fn otp_text_body(code: &str, minutes: u64) -> String {
    format!(
        "Your registration OTP code is: {}\n\
         This code expires in {} minutes.\n\
         If you did not request this, please ignore this email.\n",
        code, minutes
    )
}

fn otp_html_body(app_name: &str, code: &str, minutes: u64) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>{app_name} OTP</title>
</head>
<body style="margin:0;padding:0;background:#f6f7fb;font-family:Arial,Helvetica,sans-serif;">
  <div style="max-width:600px;margin:24px auto;background:#ffffff;border-radius:12px;overflow:hidden;">
    <div style="padding:24px 32px;background:#0f172a;color:#ffffff;">
      <div style="font-size:18px;font-weight:bold;">{app_name}</div>
      <div style="font-size:12px;opacity:.8;">Registration verification</div>
    </div>
    <div style="padding:32px;color:#111827;">
      <div style="font-size:16px;margin-bottom:12px;">Hi,</div>
      <div style="font-size:14px;line-height:1.6;margin-bottom:18px;">
        Use the OTP below to complete your registration. This code expires in <strong>{minutes} minutes</strong>.
      </div>
      <div style="font-size:28px;letter-spacing:6px;font-weight:bold;background:#f3f4f6;padding:16px 20px;border-radius:10px;display:inline-block;">
        {code}
      </div>
      <div style="font-size:12px;color:#6b7280;margin-top:18px;">
        If you did not request this, please ignore this email.
      </div>
    </div>
  </div>
</body>
</html>"#
    )
}

fn reset_text_body(token: &str, reset_url: &str, minutes: u64) -> String {
    let action = if reset_url.is_empty() {
        format!("Your password reset token is: {}", token)
    } else {
        format!("Reset your password using this link: {}", reset_url)
    };
    format!(
        "{}\n\
         This link expires in {} minutes.\n\
         If you did not request a password reset, please ignore this email.\n",
        action, minutes
    )
}

fn reset_html_body(app_name: &str, token: &str, reset_url: &str, minutes: u64) -> String {
    let action = if reset_url.is_empty() {
        format!(
            r#"<div style="font-size:20px;letter-spacing:2px;font-weight:bold;background:#f3f4f6;padding:16px 20px;border-radius:10px;display:inline-block;word-break:break-all;">{}</div>"#,
            token
        )
    } else {
        format!(
            r#"<a href="{url}" style="display:inline-block;background:#0f172a;color:#ffffff;text-decoration:none;padding:12px 24px;border-radius:8px;font-size:14px;">Reset password</a>"#,
            url = reset_url
        )
    };
    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>{app_name} password reset</title>
</head>
<body style="margin:0;padding:0;background:#f6f7fb;font-family:Arial,Helvetica,sans-serif;">
  <div style="max-width:600px;margin:24px auto;background:#ffffff;border-radius:12px;overflow:hidden;">
    <div style="padding:24px 32px;background:#0f172a;color:#ffffff;">
      <div style="font-size:18px;font-weight:bold;">{app_name}</div>
      <div style="font-size:12px;opacity:.8;">Password reset</div>
    </div>
    <div style="padding:32px;color:#111827;">
      <div style="font-size:16px;margin-bottom:12px;">Hi,</div>
      <div style="font-size:14px;line-height:1.6;margin-bottom:18px;">
        A password reset was requested for this address. It expires in <strong>{minutes} minutes</strong>.
      </div>
      {action}
      <div style="font-size:12px;color:#6b7280;margin-top:18px;">
        If you did not request a password reset, please ignore this email.
      </div>
    </div>
  </div>
</body>
</html>"#
    )
}
