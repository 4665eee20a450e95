//! InfluxDB 1.x HTTP write API, one line-protocol point per call.
//!
//! Credentials go in an `Authorization: Basic` header, never in the query.

use std::fmt::Write as _;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pm25_traits::{BoxError, ReadingStore, StoredReading};

use crate::error::SinkError;

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    /// Server root, e.g. `http://localhost:8086`.
    pub url: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub measurement: String,
    pub timeout: Duration,
}

pub struct InfluxStore {
    agent: ureq::Agent,
    write_url: String,
    cfg: InfluxConfig,
}

impl InfluxStore {
    pub fn new(cfg: InfluxConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(cfg.timeout).build();
        let write_url = format!("{}/write", cfg.url.trim_end_matches('/'));
        Self {
            agent,
            write_url,
            cfg,
        }
    }

    fn post(&self, body: &str) -> Result<(), SinkError> {
        let mut req = self
            .agent
            .post(&self.write_url)
            .query("db", &self.cfg.database);
        // Credentials stay out of the URL, which transport errors echo back.
        if let Some(auth) = basic_auth(&self.cfg) {
            req = req.set("Authorization", &auth);
        }
        let resp = req
            .set("Content-Type", "text/plain; charset=utf-8")
            .send_string(body)?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(SinkError::Status {
                status,
                body: resp.into_string().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

fn basic_auth(cfg: &InfluxConfig) -> Option<String> {
    if cfg.username.is_none() && cfg.password.is_none() {
        return None;
    }
    let user = cfg.username.as_deref().unwrap_or_default();
    let pass = cfg.password.as_deref().unwrap_or_default();
    Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
}

impl ReadingStore for InfluxStore {
    fn write_reading(&mut self, reading: &StoredReading<'_>) -> Result<(), BoxError> {
        let line = line_protocol(&self.cfg.measurement, reading);
        let secret = self.cfg.password.as_deref().unwrap_or_default();
        self.post(&line).map_err(|e| e.redact(secret))?;
        tracing::trace!(%line, "influx point written");
        Ok(())
    }
}

/// `<measurement>,location=<tag> value=<f>,voltage=<f>,aqi=<i>i,status="<name>"`
pub fn line_protocol(measurement: &str, r: &StoredReading<'_>) -> String {
    let mut line = String::with_capacity(96);
    escape_into(&mut line, measurement, &[',', ' ']);
    line.push_str(",location=");
    escape_into(&mut line, r.location, &[',', '=', ' ']);
    let _ = write!(
        line,
        " value={},voltage={},aqi={}i,status=\"",
        r.density, r.voltage, r.level_index
    );
    escape_into(&mut line, r.level_name, &['"', '\\']);
    line.push('"');
    line
}

fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(username: Option<&str>, password: Option<&str>) -> InfluxConfig {
        InfluxConfig {
            url: "http://localhost:8086".into(),
            database: "pm25".into(),
            username: username.map(Into::into),
            password: password.map(Into::into),
            measurement: "dust".into(),
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn no_credentials_no_header() {
        assert_eq!(basic_auth(&cfg(None, None)), None);
    }

    #[test]
    fn header_encodes_user_and_password() {
        // "sensor:sensor123"
        assert_eq!(
            basic_auth(&cfg(Some("sensor"), Some("sensor123"))).as_deref(),
            Some("Basic c2Vuc29yOnNlbnNvcjEyMw==")
        );
    }

    #[test]
    fn write_url_has_no_credentials() {
        let s = InfluxStore::new(cfg(Some("sensor"), Some("s3cr3t pa$$&word")));
        assert_eq!(s.write_url, "http://localhost:8086/write");
    }
}
