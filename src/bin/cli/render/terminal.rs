use chrono::NaiveDate;

use srl_lib::review::OverdueTier;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn heading(text: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}{}", Color::BOLD, Color::BLUE, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn overdue_marker(tier: OverdueTier, use_color: bool) -> String {
    match tier {
        OverdueTier::Warning => paint("!", Color::YELLOW, use_color),
        OverdueTier::Critical => paint("!!", Color::RED, use_color),
    }
}

pub fn overdue_legend(use_color: bool) -> String {
    paint(
        &format!(
            "{} 3-6 days overdue  {} 7+ days overdue",
            overdue_marker(OverdueTier::Warning, false),
            overdue_marker(OverdueTier::Critical, false)
        ),
        Color::DIM,
        use_color,
    )
}

/// `#123 ` prefix for problems with a catalog ID
pub fn external_id_prefix(id: Option<i64>, use_color: bool) -> String {
    match id {
        Some(id) => format!("{} ", paint(&format!("#{}", id), Color::DIM, use_color)),
        None => String::new(),
    }
}

pub fn plural(count: i64, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

pub fn stars(rating: u8) -> String {
    "*".repeat(rating as usize)
}

pub fn long_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_without_color_is_plain() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(3, "day"), "3 days");
        assert_eq!(external_id_prefix(Some(42), false), "#42 ");
        assert_eq!(external_id_prefix(None, false), "");
        assert_eq!(overdue_legend(false), "! 3-6 days overdue  !! 7+ days overdue");
        assert_eq!(long_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()), "Mar 05, 2024");
    }
}
