//! Request context carrying the authorized caller.

use chrono::{DateTime, Utc};

use notihub_auth::Caller;

/// Context for the current authorized request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Who the request was authorized as.
    pub caller: Caller,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(caller: Caller) -> Self {
        Self {
            caller,
            request_time: Utc::now(),
        }
    }

    /// Short description of the caller for audit messages.
    pub fn caller_label(&self) -> String {
        match &self.caller {
            Caller::Anonymous => "anonymous".to_string(),
            Caller::App(app_id) => format!("app:{app_id}"),
            Caller::User(user) => format!("user:{user}"),
        }
    }
}
