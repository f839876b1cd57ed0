//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Bucket;

/// Used for the completed column
pub const DARK_GREEN: Color = Color::Rgb(0, 120, 0);
/// Used for medium priority
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for the overdue column and high priority
pub const DARK_RED: Color = Color::Rgb(180, 20, 20);
/// Used for the upcoming column
pub const STEEL_BLUE: Color = Color::Rgb(70, 130, 180);

/// Theme color of a board column.
pub fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Upcoming => STEEL_BLUE,
        Bucket::Overdue => DARK_RED,
        Bucket::Completed => DARK_GREEN,
    }
}
