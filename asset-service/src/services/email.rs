use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use service_core::error::AppError;
use std::time::Duration;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_password_reset_email(
        &self,
        to_email: &str,
        reset_token: &str,
    ) -> Result<(), AppError>;

    async fn send_verification_email(
        &self,
        to_email: &str,
        verification_token: &str,
    ) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
    base_url: String,
}

impl EmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| AppError::EmailError(e.to_string()))?
            .credentials(creds)
            .port(587)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from: config.from.clone(),
            base_url: config.frontend_base_url.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: String,
        html_body: String,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(self
                .from
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    AppError::EmailError(e.to_string())
                })?)
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    AppError::EmailError(e.to_string())
                })?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        // SmtpTransport is blocking; hand it to the blocking pool.
        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))??;

        Ok(())
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_password_reset_email(
        &self,
        to_email: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        let link = format!("{}/reset-password?token={}", self.base_url, reset_token);
        self.send_email(
            to_email,
            "Reset your password",
            format!("Reset your password: {}", link),
            format!("<p>Reset your password: <a href=\"{0}\">{0}</a></p>", link),
        )
        .await
    }

    async fn send_verification_email(
        &self,
        to_email: &str,
        verification_token: &str,
    ) -> Result<(), AppError> {
        let link = format!("{}/verify-email?token={}", self.base_url, verification_token);
        self.send_email(
            to_email,
            "Verify your email",
            format!("Verify your email: {}", link),
            format!("<p>Verify your email: <a href=\"{0}\">{0}</a></p>", link),
        )
        .await
    }
}

/// No-op provider for tests.
pub struct MockEmailService;

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_password_reset_email(&self, to_email: &str, _: &str) -> Result<(), AppError> {
        tracing::debug!(to = %to_email, "Mock password reset email");
        Ok(())
    }

    async fn send_verification_email(&self, to_email: &str, _: &str) -> Result<(), AppError> {
        tracing::debug!(to = %to_email, "Mock verification email");
        Ok(())
    }
}
