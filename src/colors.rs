//! Terminal colours for urgency buckets.

use std::fmt::Display;

use crossterm::style::{style, Color, StyledContent, Stylize};

use crate::fields::Urgency;

/// Used for deadlines that are due today
pub const ORANGE: Color = Color::Rgb { r: 255, g: 140, b: 0 };

/// The terminal colour for an urgency bucket.
pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Overdue => Color::Red,
        Urgency::DueToday => ORANGE,
        Urgency::Imminent => Color::Yellow,
        Urgency::Soon => Color::Green,
        Urgency::Distant => Color::DarkGrey,
    }
}

/// Paint `content` in the colour of `urgency`.
pub fn paint<D: Display>(content: D, urgency: Urgency) -> StyledContent<D> {
    style(content).with(urgency_color(urgency))
}
