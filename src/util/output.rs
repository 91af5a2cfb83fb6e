use std::io::{self, Write};

use console::style;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

pub fn header(message: &str) -> String {
    style(message).bold().cyan().to_string()
}

pub fn good(message: &str) -> String {
    style(message).green().to_string()
}

pub fn bad(message: &str) -> String {
    style(message).red().to_string()
}

pub fn set_colors(enabled: bool) {
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}
