//! Dark palette and widget styles

use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme, Vector};

// --- Dark Palette ---

pub const GRAY_14: Color = Color::from_rgb(0.141, 0.141, 0.141); // Header band
pub const GRAY_17: Color = Color::from_rgb(0.169, 0.169, 0.169); // Option panel
pub const GRAY_20: Color = Color::from_rgb(0.200, 0.200, 0.200); // Hover
pub const GRAY_60: Color = Color::from_rgb(0.600, 0.600, 0.600); // Secondary text
pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);

pub const TEXT_PRIMARY: Color = WHITE;
pub const TEXT_SECONDARY: Color = GRAY_60;
pub const SUCCESS: Color = Color::from_rgb(0.063, 0.725, 0.506);
pub const DANGER: Color = Color::from_rgb(0.937, 0.267, 0.267);

// --- Container Styles ---

pub struct HeaderContainer;

impl container::StyleSheet for HeaderContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Color(GRAY_14)),
            ..Default::default()
        }
    }
}

pub struct OptionsContainer;

impl container::StyleSheet for OptionsContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Color(GRAY_17)),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

// --- Button Styles ---

/// Low-emphasis button for secondary actions
pub struct MutedButton;

impl button::StyleSheet for MutedButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(GRAY_14)),
            text_color: TEXT_PRIMARY,
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            shadow_offset: Vector::new(0.0, 0.0),
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(GRAY_20)),
            ..self.active(style)
        }
    }
}
