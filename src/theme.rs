use ratatui::style::Color;

// Surfaces
pub const BG_DARK: Color = Color::Rgb(16, 18, 24);
pub const BG_BAR: Color = Color::Rgb(22, 25, 33);
pub const BG_SURFACE: Color = Color::Rgb(27, 31, 41);
pub const BG_HIGHLIGHT: Color = Color::Rgb(36, 41, 56);

// Accent used for the app name, day headers and key hints
pub const PURPLE: Color = Color::Rgb(139, 116, 246);

pub const TEXT: Color = Color::Rgb(226, 228, 235);
pub const TEXT_DIM: Color = Color::Rgb(140, 146, 166);
pub const TEXT_MUTED: Color = Color::Rgb(86, 92, 112);

// Change semantics: created/new values, deleted/failed, pending, people
pub const GREEN: Color = Color::Rgb(74, 214, 150);
pub const RED: Color = Color::Rgb(244, 112, 112);
pub const YELLOW: Color = Color::Rgb(246, 196, 72);
pub const CYAN: Color = Color::Rgb(110, 222, 240);
