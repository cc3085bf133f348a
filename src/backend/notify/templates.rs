/**
 * Mail Templates
 *
 * Subject lines and HTML bodies for the mails the backend sends. Every
 * user-supplied string is HTML-escaped before it is placed in a body.
 */

use crate::backend::notify::Mail;
use crate::shared::Permission;

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Sent after a successful registration
pub fn welcome(to: &str, name: &str) -> Mail {
    Mail {
        to: to.to_string(),
        subject: "Welcome to EditSync!".to_string(),
        html: format!(
            "<h2>Welcome, {}!</h2><p>Thank you for registering at EditSync. We're excited to have you on board.</p>",
            escape_html(name)
        ),
    }
}

/// Password reset link, valid for one hour
pub fn password_reset(to: &str, frontend_url: &str, token: &str) -> Mail {
    let reset_url = format!("{}/reset-password?token={}", frontend_url.trim_end_matches('/'), token);
    Mail {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        html: format!(
            "<h2>Password Reset Request</h2>\
             <p>Click the link below to reset your password. This link will expire in 1 hour.</p>\
             <a href=\"{}\">Reset Password</a>\
             <p>If you did not request this, please ignore this email.</p>",
            escape_html(&reset_url)
        ),
    }
}

/// Notice that `sender` shared the document titled `title`
pub fn share_document(
    to: &str,
    sender: &str,
    title: &str,
    permission: Permission,
    message: Option<&str>,
) -> Mail {
    let note = message
        .filter(|m| !m.trim().is_empty())
        .map(|m| format!("<p>Message: {}</p>", escape_html(m)))
        .unwrap_or_default();
    Mail {
        to: to.to_string(),
        subject: format!("{} shared a document with you", sender),
        html: format!(
            "<h2>Document Shared</h2>\
             <p>{} has shared the document \"{}\" with you.</p>\
             {}\
             <p>You can access the document with {} permissions.</p>",
            escape_html(sender),
            escape_html(title),
            note,
            permission
        ),
    }
}
