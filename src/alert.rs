//! Alert delivery with ordered channel fallback
//!
//! SMS is attempted first; on any SMS failure the alert falls back to email,
//! provided the address passes a basic syntactic check. Each channel gets at
//! most one attempt per dispatch, and every failure is caught and folded into
//! the terminal [`AlertOutcome`] rather than propagated.

use crate::StormwatchError;
use crate::config::{EmailConfig, SmsConfig, StormwatchConfig};
use crate::models::AlertOutcome;
use anyhow::{Context, Result};
use lettre::{
    Message, Transport, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Subject line used for fallback emails
const EMAIL_SUBJECT: &str = "Severe Weather Alert";

/// Basic email shape: local part, `@`, domain, `.`, tld
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^@]+@[^@]+\.[^@]+").expect("email pattern is valid"));

/// Check an address against the basic email shape
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// SMS delivery channel; returns the provider message id on success
pub trait SmsChannel {
    fn send(&self, to: &str, body: &str) -> Result<String>;
}

/// Email delivery channel
pub trait EmailChannel {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Twilio REST API SMS channel
pub struct TwilioSms {
    http: reqwest::blocking::Client,
    config: SmsConfig,
}

impl TwilioSms {
    const API_BASE: &'static str = "https://api.twilio.com/2010-04-01";

    /// Create the channel; missing credentials surface per send, not here
    pub fn new(config: &StormwatchConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .build()
            .with_context(|| "Failed to create HTTP client for SMS channel")?;

        Ok(Self {
            http,
            config: config.sms.clone(),
        })
    }
}

/// Message resource returned by the provider on creation
#[derive(Debug, serde::Deserialize)]
struct MessageResource {
    sid: String,
}

impl SmsChannel for TwilioSms {
    fn send(&self, to: &str, body: &str) -> Result<String> {
        let account_sid = self
            .config
            .account_sid
            .as_deref()
            .ok_or_else(|| StormwatchError::channel("SMS account sid is not configured"))?;
        let auth_token = self
            .config
            .auth_token
            .as_deref()
            .ok_or_else(|| StormwatchError::channel("SMS auth token is not configured"))?;
        let from_number = self
            .config
            .from_number
            .as_deref()
            .ok_or_else(|| StormwatchError::channel("SMS sender number is not configured"))?;

        debug!("Sending SMS to {}", to);

        let url = format!("{}/Accounts/{}/Messages.json", Self::API_BASE, account_sid);
        let response = self
            .http
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&[("To", to), ("From", from_number), ("Body", body)])
            .send()
            .with_context(|| "SMS request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(StormwatchError::channel(format!(
                "SMS provider rejected the message (HTTP {status}): {detail}"
            ))
            .into());
        }

        let resource: MessageResource = response
            .json()
            .with_context(|| "Failed to parse SMS provider response")?;

        info!("SMS sent successfully ({})", resource.sid);
        Ok(resource.sid)
    }
}

/// Authenticated SMTP relay email channel
pub struct SmtpEmail {
    config: EmailConfig,
}

impl SmtpEmail {
    #[must_use]
    pub fn new(config: &StormwatchConfig) -> Self {
        Self {
            config: config.email.clone(),
        }
    }

    fn create_mailer(&self, address: &str, password: &str) -> Result<SmtpTransport> {
        let credentials = Credentials::new(address.to_string(), password.to_string());

        let mailer = SmtpTransport::relay(&self.config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(mailer)
    }
}

impl EmailChannel for SmtpEmail {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let address = self
            .config
            .address
            .as_deref()
            .ok_or_else(|| StormwatchError::channel("Email sender address is not configured"))?;
        let password = self
            .config
            .password
            .as_deref()
            .ok_or_else(|| StormwatchError::channel("Email password is not configured"))?;

        let email = Message::builder()
            .from(
                format!("Stormwatch <{address}>")
                    .parse()
                    .with_context(|| "Failed to parse from address")?,
            )
            .to(to.parse().with_context(|| "Failed to parse to address")?)
            .subject(subject)
            .body(body.to_string())?;

        let mailer = self.create_mailer(address, password)?;

        mailer.send(&email).with_context(|| "Failed to send email")?;

        info!("Email sent successfully to {}", to);
        Ok(())
    }
}

/// Dispatch step of the fallback protocol
#[derive(Debug)]
enum DispatchStep {
    TrySms,
    TryEmail,
    Done(AlertOutcome),
}

/// Sends alerts through SMS with email fallback
pub struct AlertSender {
    sms: Box<dyn SmsChannel>,
    email: Box<dyn EmailChannel>,
}

impl AlertSender {
    /// Build the sender with the real Twilio and SMTP channels
    pub fn new(config: &StormwatchConfig) -> Result<Self> {
        Ok(Self {
            sms: Box::new(TwilioSms::new(config)?),
            email: Box::new(SmtpEmail::new(config)),
        })
    }

    /// Build the sender from explicit channels
    #[must_use]
    pub fn with_channels(sms: Box<dyn SmsChannel>, email: Box<dyn EmailChannel>) -> Self {
        Self { sms, email }
    }

    /// Deliver one alert: SMS first, email on SMS failure
    ///
    /// `TrySms -> Done(Sms)` on success, otherwise `TryEmail`, which
    /// validates the address before attempting delivery. The terminal
    /// outcome names exactly one of SMS, Email, or Failed.
    pub fn dispatch(&self, phone: &str, email: &str, message: &str) -> AlertOutcome {
        let mut step = DispatchStep::TrySms;

        loop {
            step = match step {
                DispatchStep::TrySms => match self.sms.send(phone, message) {
                    Ok(message_id) => DispatchStep::Done(AlertOutcome::sms(message_id)),
                    Err(e) => {
                        warn!("SMS sending failed: {:#}", e);
                        DispatchStep::TryEmail
                    }
                },
                DispatchStep::TryEmail => {
                    if !is_valid_email(email) {
                        DispatchStep::Done(AlertOutcome::failed("Invalid email address"))
                    } else {
                        match self.email.send(email, EMAIL_SUBJECT, message) {
                            Ok(()) => DispatchStep::Done(AlertOutcome::email("Email sent")),
                            Err(e) => {
                                warn!("Email sending failed: {:#}", e);
                                DispatchStep::Done(AlertOutcome::failed(format!("{e:#}")))
                            }
                        }
                    }
                }
                DispatchStep::Done(outcome) => return outcome,
            };
        }
    }
}
