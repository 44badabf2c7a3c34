//! Account emails
//!
//! User-supplied values are HTML-escaped before interpolation.

use std::time::Duration;

use platform::mail::MailMessage;

pub const VERIFICATION_SUBJECT: &str = "Please confirm your inscription to TWILIGHT";
pub const RESET_PASSWORD_SUBJECT: &str = "Twilight : Reinit your password";

fn hours(ttl: Duration) -> u64 {
    (ttl.as_secs() / 3600).max(1)
}

pub fn welcome(to: &str, first_name: &str, link: &str, ttl: Duration) -> MailMessage {
    let first_name = html_escape::encode_text(first_name);
    let link = html_escape::encode_double_quoted_attribute(link);
    let html = format!(
        "<h1>{first_name} Welcome to Twilight !</h1>\
         <p>Thank you for registering. Please confirm your email by clicking on the link below</p>\
         <a href=\"{link}\">Confirm my email</a>\
         <p>This link will expire after {} hours</p>",
        hours(ttl)
    );
    MailMessage::new(to, VERIFICATION_SUBJECT, html)
}

pub fn reset_password(to: &str, first_name: &str, link: &str, ttl: Duration) -> MailMessage {
    let first_name = html_escape::encode_text(first_name);
    let link = html_escape::encode_double_quoted_attribute(link);
    let html = format!(
        "<p>Hi {first_name},</p>\
         <p>You forgot your password to the Twilight application: please click the link below to reinitialize your password :</p>\
         <a href=\"{link}\">Reset My Password</a>.\
         <p>This link will expire in {} hour.</p>",
        hours(ttl)
    );
    MailMessage::new(to, RESET_PASSWORD_SUBJECT, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_contains_link_and_ttl() {
        let mail = welcome(
            "a@x.com",
            "Ann",
            "http://localhost:3000/users/verify-email/abc",
            Duration::from_secs(24 * 3600),
        );
        assert_eq!(mail.to, "a@x.com");
        assert_eq!(mail.subject, VERIFICATION_SUBJECT);
        assert!(mail.html.contains("href=\"http://localhost:3000/users/verify-email/abc\""));
        assert!(mail.html.contains("expire after 24 hours"));
    }

    #[test]
    fn test_first_name_is_escaped() {
        let mail = reset_password(
            "a@x.com",
            "<script>",
            "http://x/auth/reset-password/t",
            Duration::from_secs(3600),
        );
        assert!(!mail.html.contains("<script>"));
        assert!(mail.html.contains("&lt;script&gt;"));
    }
}
