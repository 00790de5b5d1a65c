// Thin SMTP client used to deliver verification emails.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct SmtpOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Display name used in the `From` header. The address is `username`.
    pub from_name: String,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Build a STARTTLS relay transport. No connection is opened until the first send.
    pub fn new(options: SmtpOptions) -> Result<Self, MailerError> {
        let sender = build_sender(&options.from_name, &options.username)?;
        let credentials = Credentials::new(options.username, options.password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&options.host)?
            .port(options.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, sender })
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    /// Send an HTML email to a single recipient.
    pub async fn send_html(
        &self,
        recipient: &str,
        subject: &str,
        html: String,
    ) -> Result<(), MailerError> {
        let message = build_html_message(&self.sender, recipient, subject, html)?;

        let response = self.transport.send(message).await?;
        tracing::debug!(
            code = %response.code(),
            "SMTP relay accepted message"
        );

        Ok(())
    }
}

fn build_sender(from_name: &str, address: &str) -> Result<Mailbox, MailerError> {
    let address: Address = address.parse()?;
    let name = if from_name.is_empty() {
        None
    } else {
        Some(from_name.to_string())
    };
    Ok(Mailbox::new(name, address))
}

fn build_html_message(
    sender: &Mailbox,
    recipient: &str,
    subject: &str,
    html: String,
) -> Result<Message, MailerError> {
    let to = Mailbox::new(None, recipient.parse::<Address>()?);

    let message = Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html)?;

    Ok(message)
}
