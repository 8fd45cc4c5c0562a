//! Email dispatch for admin replies.
//!
//! Delivery goes through a remote function with a `{to, subject, html}`
//! payload. This is a best-effort side-channel: the caller records the message
//! first and only then attempts dispatch, logging (never surfacing) a failure.

use crate::config::EmailConfig;
use crate::errors::Result;
use crate::gateway::FunctionInvoker;
use std::sync::Arc;

pub struct EmailDispatcher {
    invoker: Arc<dyn FunctionInvoker>,
    config: EmailConfig,
}

impl EmailDispatcher {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, config: EmailConfig) -> Self {
        Self { invoker, config }
    }

    /// Send an admin reply to `to_email`. Returns `Ok(())` without dispatching
    /// when email is disabled in the configuration.
    pub async fn send_reply(&self, to_email: &str, to_name: &str, subject: &str, body: &str) -> Result<()> {
        if !self.config.enabled {
            tracing::debug!(to = to_email, "email dispatch disabled, skipping");
            return Ok(());
        }

        let html = self.create_reply_body(to_name, subject, body);
        let payload = serde_json::json!({
            "to": to_email,
            "subject": subject,
            "html": html,
        });
        self.invoker.invoke(&self.config.function, &payload).await
    }

    fn create_reply_body(&self, to_name: &str, subject: &str, body: &str) -> String {
        let from_name = &self.config.from_name;
        let greeting = if to_name.is_empty() {
            "Hello,".to_string()
        } else {
            format!("Hello {to_name},")
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{subject}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .reply {{ padding: 15px; background: #f5f5f5; border-left: 3px solid #2563eb; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>{subject}</h2>

        <p>{greeting}</p>

        <p>You have a new reply regarding your application:</p>

        <div class="reply">{body}</div>

        <div class="footer">
            <p>Sent by {from_name}. Please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    #[async_trait::async_trait]
    impl FunctionInvoker for RecordingInvoker {
        async fn invoke(&self, name: &str, payload: &serde_json::Value) -> Result<()> {
            self.calls.lock().unwrap().push((name.to_string(), payload.clone()));
            Ok(())
        }
    }

    #[test]
    fn reply_body_includes_greeting_and_message() {
        let dispatcher = EmailDispatcher::new(Arc::new(RecordingInvoker::default()), EmailConfig::default());
        let body = dispatcher.create_reply_body("Jane Doe", "About your application", "You have been shortlisted.");
        assert!(body.contains("Hello Jane Doe,"));
        assert!(body.contains("About your application"));
        assert!(body.contains("You have been shortlisted."));
    }

    #[test]
    fn reply_body_without_name_uses_plain_greeting() {
        let dispatcher = EmailDispatcher::new(Arc::new(RecordingInvoker::default()), EmailConfig::default());
        let body = dispatcher.create_reply_body("", "Subject", "Body");
        assert!(body.contains("Hello,"));
    }

    #[tokio::test]
    async fn dispatch_sends_structured_payload() {
        let invoker = Arc::new(RecordingInvoker::default());
        let dispatcher = EmailDispatcher::new(invoker.clone(), EmailConfig::default());

        dispatcher
            .send_reply("jane@example.com", "Jane Doe", "About your application", "Reply text")
            .await
            .unwrap();

        let calls = invoker.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (function, payload) = &calls[0];
        assert_eq!(function, "send-email");
        assert_eq!(payload["to"], "jane@example.com");
        assert_eq!(payload["subject"], "About your application");
        assert!(payload["html"].as_str().unwrap().contains("Reply text"));
    }

    #[tokio::test]
    async fn disabled_config_skips_dispatch() {
        let invoker = Arc::new(RecordingInvoker::default());
        let config = EmailConfig {
            enabled: false,
            ..EmailConfig::default()
        };
        let dispatcher = EmailDispatcher::new(invoker.clone(), config);

        dispatcher.send_reply("jane@example.com", "Jane", "Subject", "Body").await.unwrap();
        assert!(invoker.calls.lock().unwrap().is_empty());
    }
}
