use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The server answered with a status we treat as failure.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Connection, DNS, TLS or timeout.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for SinkError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(status, resp) => SinkError::Status {
                status,
                body: resp.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(t) => SinkError::Transport(t.to_string()),
        }
    }
}

impl SinkError {
    /// Replace every occurrence of `secret` in the error text. Transport
    /// errors echo the request URL, which for Telegram embeds the bot token.
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        match self {
            SinkError::Status { status, body } => SinkError::Status {
                status,
                body: body.replace(secret, "***"),
            },
            SinkError::Transport(s) => SinkError::Transport(s.replace(secret, "***")),
            other => other,
        }
    }
}
