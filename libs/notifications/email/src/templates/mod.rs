//! HTML bodies for personalized emails
//!
//! Rendering is pure string work: the contact's name goes into the greeting
//! and either the contact's description or a custom message goes into the
//! content block. A custom message may reference `{name}` and
//! `{description}`; nothing else is interpreted.

use domain_contacts::Contact;

pub const NAME_TOKEN: &str = "{name}";
pub const DESCRIPTION_TOKEN: &str = "{description}";

/// Which body to render for each contact
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BodyTemplate {
    /// Greeting plus the contact's description
    #[default]
    Default,
    /// Greeting plus a custom message with `{name}`/`{description}` tokens
    Custom(String),
}

impl BodyTemplate {
    /// `Custom` for a non-blank message, `Default` otherwise
    pub fn from_message(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::Custom(m.to_string()),
            _ => Self::Default,
        }
    }

    pub fn render(&self, contact: &Contact) -> String {
        match self {
            Self::Default => render_default(contact),
            Self::Custom(template) => render_custom(contact, template),
        }
    }
}

/// Default body: greeting plus the contact's description
pub fn render_default(contact: &Contact) -> String {
    layout(contact.name(), contact.description())
}

/// Custom body: `template` with its tokens replaced, inside the same layout
pub fn render_custom(contact: &Contact, template: &str) -> String {
    layout(contact.name(), &substitute(template, contact))
}

/// Replace `{name}` and `{description}` in a single left-to-right pass.
///
/// Substituted values are never rescanned, and any other brace sequence is
/// copied through untouched.
pub fn substitute(template: &str, contact: &Contact) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix(NAME_TOKEN) {
            out.push_str(contact.name());
            rest = after;
        } else if let Some(after) = tail.strip_prefix(DESCRIPTION_TOKEN) {
            out.push_str(contact.description());
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

fn layout(name: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .content {{ padding: 20px 0; }}
        .footer {{ margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h2>Hello {name},</h2>
        </div>
        <div class="content">
            <p>{content}</p>
        </div>
        <div class="footer">
            <p>This email was sent automatically. Please do not reply to this message.</p>
        </div>
    </div>
</body>
</html>"#
    )
}
