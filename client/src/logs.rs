use std::fmt::Display;

use colored::{
    Color,
    Colorize,
};

#[derive(strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

fn log(level: Level, label: impl Display, msg: impl Display) {
    let color = level.get_color();
    let line = format!(
        "[{}] {} {}",
        level.to_string().color(color),
        label.to_string().color(LogColor::Debug),
        msg.to_string().bright_black()
    );
    match level {
        Level::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

impl Level {
    fn get_color(&self) -> LogColor {
        match self {
            Self::Info => LogColor::Info,
            Self::Success => LogColor::Highlight,
            Self::Warning => LogColor::Warning,
            Self::Error => LogColor::Error,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum LogColor {
    Highlight,
    Debug,
    Error,
    Warning,
    Header,
    Info,
    Gray,
}

/// Prints a `label: value` pair, with the label colored [`LogColor::Gray`] unless another
/// color is passed.
#[macro_export]
macro_rules! print_kv {
    ($label:expr, $value:expr $(,)?) => {
        $crate::print_kv!($label, $value, $crate::logs::LogColor::Gray)
    };
    ($label:expr, $value:expr, $color:expr $(,)?) => {{
        use ::colored::Colorize as _;
        println!("{}: {}", $label.to_string().color($color), $value);
    }};
}

impl LogColor {
    const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Highlight => (255, 215, 87),
            Self::Debug => (40, 100, 153),
            Self::Error => (255, 0, 45),
            Self::Warning => (180, 105, 0),
            Self::Header => (0, 255, 0),
            Self::Info => (0, 95, 255),
            Self::Gray => (192, 192, 192),
        }
    }
}

impl From<LogColor> for Color {
    fn from(value: LogColor) -> Color {
        let (r, g, b) = value.rgb();
        Color::TrueColor { r, g, b }
    }
}

pub fn log_info(label: impl Display, msg: impl Display) {
    log(Level::Info, label, msg)
}

pub fn log_success(label: impl Display, msg: impl Display) {
    log(Level::Success, label, msg)
}

pub fn log_warning(label: impl Display, msg: impl Display) {
    log(Level::Warning, label, msg)
}

/// Written to stderr.
pub fn log_error(label: impl Display, msg: impl Display) {
    log(Level::Error, label, msg)
}

pub fn log_divider() {
    println!("{}", "-".repeat(80));
}
