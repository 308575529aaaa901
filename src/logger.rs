use std::fmt::Display;

/// Reset sequence appended after a styled prefix.
const STYLE_RESET: &str = "\x1b[0m";

/// Console channel a message is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Standard output.
    Info,
    /// Standard error.
    Warn,
    /// Standard error.
    Error,
}

/// A labeled console logger for a named subsystem.
///
/// Holds a prefix and a style that are prepended to every line. The style
/// is an ANSI escape sequence applied to the prefix only; an empty style
/// leaves the prefix undecorated.
#[derive(Clone, Debug)]
pub struct Logger {
    prefix: String,
    style: String,
}

impl Logger {
    /// Returns a new Logger.
    ///
    /// # Arguments
    ///
    /// * `prefix` label written at the start of every line, any string is accepted.
    /// * `style` ANSI escape sequence used to decorate the prefix, empty for none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mojang_auth::Logger;
    ///
    /// let logger = Logger::new("[Mojang]", "\x1b[31m");
    /// logger.log("Api status responded with code 200");
    /// ```
    pub fn new(prefix: &str, style: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            style: style.to_string(),
        }
    }

    /// Writes a message to standard output.
    pub fn log(&self, message: impl Display) {
        self.write(Channel::Info, message);
    }

    /// Writes a warning to standard error.
    pub fn warn(&self, message: impl Display) {
        self.write(Channel::Warn, message);
    }

    /// Writes an error to standard error.
    pub fn error(&self, message: impl Display) {
        self.write(Channel::Error, message);
    }

    /// Writes a message to the given channel.
    pub fn write(&self, channel: Channel, message: impl Display) {
        let line = self.format_line(message);
        match channel {
            Channel::Info => println!("{}", line),
            Channel::Warn | Channel::Error => eprintln!("{}", line),
        }
    }

    fn format_line(&self, message: impl Display) -> String {
        if self.style.is_empty() {
            format!("{} {}", self.prefix, message)
        } else {
            format!("{}{}{} {}", self.style, self.prefix, STYLE_RESET, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prefix() {
        let logger = Logger::new("[Mojang]", "");
        assert_eq!(logger.format_line("hello"), "[Mojang] hello");
    }

    #[test]
    fn styled_prefix_resets_before_message() {
        let logger = Logger::new("[Mojang]", "\x1b[31m");
        assert_eq!(
            logger.format_line("hello"),
            "\x1b[31m[Mojang]\x1b[0m hello"
        );
    }
}
