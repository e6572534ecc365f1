use labtrack_core::ports::EmailMessage;

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Password reset mail linking to `{frontend}/reset-password?token=...`.
pub fn password_reset_email(
    to: &str,
    name: &str,
    frontend_url: &str,
    token: &str,
    valid_minutes: i64,
) -> EmailMessage {
    let link = format!(
        "{}/reset-password?token={}",
        frontend_url.trim_end_matches('/'),
        token
    );

    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px;">
  <h2 style="color: #007BFF; text-align: center;">Password Reset Request</h2>
  <p>Hello <strong>{name}</strong>,</p>
  <p>We received a request to reset your password. If this was you, use the button below to choose a new one.
  If you did not request a reset, you can ignore this email.</p>
  <p style="text-align: center; margin: 30px 0;">
    <a href="{link}" style="padding: 12px 24px; background-color: #007BFF; color: #fff; text-decoration: none; border-radius: 6px;">Reset Password</a>
  </p>
  <p>This link stays valid for <strong>{valid_minutes} minutes</strong>.</p>
</div>"#,
        name = escape_html(name),
        link = escape_html(&link),
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Reset Password".to_string(),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_and_validity_are_rendered() {
        let msg = password_reset_email("a@lab.io", "Ann <admin>", "https://app.lab.io/", "tok", 30);

        assert_eq!(msg.to, "a@lab.io");
        assert!(msg.html_body.contains("https://app.lab.io/reset-password?token=tok"));
        assert!(msg.html_body.contains("30 minutes"));
        assert!(msg.html_body.contains("Ann &lt;admin&gt;"));
    }
}
