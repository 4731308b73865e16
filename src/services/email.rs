use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::config::Config;

const SCHOOL_NAME: &str = "Ifa Boru Boarding School";

pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Returns None if SMTP is not fully configured.
    pub fn new(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let username = config.smtp_username.clone()?;
        let password = config.smtp_password.clone()?;
        let from_addr = config.smtp_from.as_deref()?;

        let port = config.smtp_port.unwrap_or(587);
        let creds = Credentials::new(username, password);

        let transport = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .ok()?
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()?
                .credentials(creds)
                .build()
        };

        let from: Mailbox = from_addr.parse().ok()?;

        Some(Self { transport, from })
    }

    fn new_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }

    fn wrap_html(content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{SCHOOL_NAME}</title></head>
<body style="margin:0;padding:24px;background:#f1f5f9;font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif">
  <div style="max-width:520px;margin:0 auto">
    <p style="font-size:18px;font-weight:700;color:#0f172a;text-align:center">{SCHOOL_NAME}</p>
    <div style="background:#ffffff;border-radius:12px;padding:32px">
      {content}
    </div>
  </div>
</body>
</html>"#
        )
    }

    async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> anyhow::Result<()> {
        let to: Mailbox = to.parse()?;
        let email = Message::builder()
            .message_id(Some(self.new_message_id()))
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?;

        self.transport.send(email).await?;
        Ok(())
    }

    pub async fn send_password_reset(
        &self,
        to: &str,
        display_name: &str,
        reset_url: &str,
    ) -> anyhow::Result<()> {
        let subject = format!("{SCHOOL_NAME} — Password reset");
        let text = format!(
            "Hello {display_name},\n\nA password reset was requested for your account.\n\
             Open this link to choose a new password (valid for 1 hour):\n{reset_url}\n\n\
             If you did not request this, you can ignore this email."
        );
        let html = Self::wrap_html(&format!(
            r#"<p>Hello {display_name},</p>
<p>A password reset was requested for your account. The link below is valid for 1 hour.</p>
<p><a href="{reset_url}">Reset my password</a></p>
<p style="color:#64748b;font-size:13px">If you did not request this, you can ignore this email.</p>"#
        ));
        self.send(to, &subject, &text, &html).await
    }

    pub async fn send_password_change_confirmation(
        &self,
        to: &str,
        display_name: &str,
    ) -> anyhow::Result<()> {
        let subject = format!("{SCHOOL_NAME} — Your password was changed");
        let text = format!(
            "Hello {display_name},\n\nYour account password was just changed.\n\
             If this was not you, contact the school administration immediately."
        );
        let html = Self::wrap_html(&format!(
            r#"<p>Hello {display_name},</p>
<p>Your account password was just changed.</p>
<p style="color:#64748b;font-size:13px">If this was not you, contact the school administration immediately.</p>"#
        ));
        self.send(to, &subject, &text, &html).await
    }
}
