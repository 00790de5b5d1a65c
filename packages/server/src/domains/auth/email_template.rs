//! Verification email rendering.

use chrono::Duration;

pub const OTP_EMAIL_SUBJECT: &str = "Código de verificación - Sistema Subsidios";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Render the HTML email that carries a verification code.
pub fn render_otp_email(code: &str, validity: Duration) -> RenderedEmail {
    // Whole minutes, rounded up
    let minutes = ((validity.num_seconds() + 59) / 60).max(1);
    let unit = if minutes == 1 { "minuto" } else { "minutos" };

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px;">
    <h2 style="color: #0033A0;">Sistema Subsidios</h2>
    <p>Tu código de verificación es:</p>
    <div style="background: #0033A0; color: white; padding: 15px; text-align: center; font-size: 32px; border-radius: 8px; width: 200px; margin: auto;">
        {code}
    </div>
    <p style="margin-top: 20px;">Este código expira en <strong>{minutes} {unit}</strong>.</p>
    <p style="margin-top: 30px; font-size: 12px; color: #666;">
        Si no fuiste tú quien solicitó este código, ignora este mensaje.
    </p>
</div>"#
    );

    RenderedEmail {
        subject: OTP_EMAIL_SUBJECT.to_string(),
        html,
    }
}
