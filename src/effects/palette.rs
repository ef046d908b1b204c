//! Colors used by the celebration bursts

pub const RED: &str = "#ff0000";
pub const GREEN: &str = "#00ff00";
pub const WHITE: &str = "#ffffff";
pub const GOLD: &str = "#ffd700";
pub const PINK: &str = "#ff69b4";
pub const CYAN: &str = "#00ffff";

/// Full festive palette, in the order the finale uses it
pub const FESTIVE: &[&str] = &[RED, GREEN, WHITE, GOLD, PINK, CYAN];
