//! Nord theme
//! https://www.nordtheme.com/

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        // Polar Night
        bg0: Color::Rgb(0x2e, 0x34, 0x40), // nord0
        bg1: Color::Rgb(0x3b, 0x42, 0x52), // nord1
        bg2: Color::Rgb(0x43, 0x4c, 0x5e), // nord2
        // Snow Storm
        fg0: Color::Rgb(0xec, 0xef, 0xf4), // nord6
        fg1: Color::Rgb(0xe5, 0xe9, 0xf0), // nord5
        muted: Color::Rgb(0x4c, 0x56, 0x6a), // nord3
        // Frost and Aurora
        accent: Color::Rgb(0x88, 0xc0, 0xd0),    // nord8
        highlight: Color::Rgb(0xeb, 0xcb, 0x8b), // nord13
        error: Color::Rgb(0xbf, 0x61, 0x6a),     // nord11
        success: Color::Rgb(0xa3, 0xbe, 0x8c),   // nord14
    }
}
