use colored::Color;
use std::env;

/// Turns colors on only for a terminal, and never under `--no-color` or `NO_COLOR`.
pub fn configure_colors(no_color: bool) {
    let enabled = !no_color && env::var_os("NO_COLOR").is_none() && console::colors_enabled();
    colored::control::set_override(enabled);
}

/// Terminal color for a Trello label color name (`green`, `sky`, `purple_dark`, ...).
pub fn label_color(name: &str) -> Color {
    let base = name.split('_').next().unwrap_or(name);
    match base {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "orange" => Color::TrueColor {
            r: 255,
            g: 159,
            b: 26,
        },
        "red" => Color::Red,
        "purple" => Color::Magenta,
        "blue" => Color::Blue,
        "sky" => Color::Cyan,
        "lime" => Color::BrightGreen,
        "pink" => Color::BrightMagenta,
        "black" => Color::BrightBlack,
        _ => Color::White,
    }
}
