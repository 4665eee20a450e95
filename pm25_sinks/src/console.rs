//! Terminal stand-ins for the OLED and the messaging channel.

use std::io::{self, Write};

use pm25_traits::{AlertMessage, AlertNotifier, BoxError, StatusDisplay};

use crate::error::SinkError;
use crate::message::format_alert;

/// Prints one status line per frame.
pub struct ConsoleDisplay<W: Write> {
    out: W,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusDisplay for ConsoleDisplay<W> {
    fn render(&mut self, density: f32, level_name: &str, glyph: &str) -> Result<(), BoxError> {
        writeln!(self.out, "PM2.5 {density:6.1} ug/m3 | {level_name:<10} {glyph}")
            .and_then(|()| self.out.flush())
            .map_err(SinkError::from)?;
        Ok(())
    }
}

/// Logs alerts instead of sending them. Always succeeds, so cooldown applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn send_alert(&mut self, alert: &AlertMessage) -> Result<(), BoxError> {
        tracing::warn!(
            density = alert.density,
            level = alert.level_name,
            "{}",
            format_alert(alert)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_an_io_sink_error() {
        let err = ConsoleDisplay::new(ClosedPipe)
            .render(12.0, "EXCELLENT", "★★★★★")
            .expect_err("pipe is closed");
        let sink = err.downcast_ref::<SinkError>().expect("sink error");
        assert!(matches!(sink, SinkError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn renders_fixed_width_value() {
        let mut d = ConsoleDisplay::new(Vec::new());
        d.render(7.04, "EXCELLENT", "★★★★★").expect("render");
        d.render(187.36, "VERY BAD", "★☆☆☆☆").expect("render");
        let text = String::from_utf8(d.into_inner()).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "PM2.5    7.0 ug/m3 | EXCELLENT  ★★★★★");
        assert_eq!(lines[1], "PM2.5  187.4 ug/m3 | VERY BAD   ★☆☆☆☆");
    }
}
