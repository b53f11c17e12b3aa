//! ANSI SGR coloring for terminal output.

/// Terminal colors used by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Dim,
    Bold,
}

impl Color {
    fn sgr(self) -> &'static str {
        match self {
            Color::Red => "1;31",
            Color::Green => "1;32",
            Color::Yellow => "33",
            Color::Blue => "1;34",
            Color::Magenta => "35",
            Color::Cyan => "36",
            Color::Dim => "2",
            Color::Bold => "1",
        }
    }
}

/// Wraps text in escape sequences, or passes it through when disabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, color: Color, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", color.sgr(), text)
        } else {
            text.to_string()
        }
    }
}
