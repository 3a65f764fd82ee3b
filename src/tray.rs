//! Tray icon rendering for the menubar.

use crate::models::{Mode, Theme};
use thiserror::Error;
use tray_icon::Icon;

/// Standard macOS tray icon size.
const ICON_SIZE: u32 = 22;

#[derive(Error, Debug)]
pub enum TrayError {
    #[error("Failed to load icon: {0}")]
    IconLoad(#[from] tray_icon::BadIcon),
    #[error("Tray error: {0}")]
    Tray(#[from] tray_icon::Error),
}

/// Fill colour per mode: red for work, blue for breaks, green for long breaks.
fn mode_color(mode: Mode) -> [u8; 3] {
    match mode {
        Mode::Work => [231, 76, 60],
        Mode::Break => [52, 152, 219],
        Mode::LongBreak => [39, 174, 96],
    }
}

/// Outline colour. Light menubars get a dark rim so the disc stays visible.
fn rim_color(mode: Mode, theme: Theme) -> [u8; 3] {
    match theme {
        Theme::Dark => mode_color(mode),
        Theme::Light => [40, 40, 40],
    }
}

/// Renders a filled disc with an anti-aliased rim as RGBA pixels.
fn icon_rgba(mode: Mode, theme: Theme) -> Vec<u8> {
    let size = ICON_SIZE;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let center = size as f32 / 2.0;
    let radius = (size as f32 / 2.0) - 2.0;
    let fill = mode_color(mode);
    let rim = rim_color(mode, theme);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance <= radius - 1.5 {
                rgba.extend_from_slice(&fill);
                rgba.push(255);
            } else if distance <= radius {
                rgba.extend_from_slice(&rim);
                rgba.push(255);
            } else if distance <= radius + 1.0 {
                // Anti-aliased edge
                let alpha = ((radius + 1.0 - distance) * 255.0) as u8;
                rgba.extend_from_slice(&rim);
                rgba.push(alpha);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    rgba
}

/// Builds the tray icon for the given mode and theme.
pub fn load_icon(mode: Mode, theme: Theme) -> Result<Icon, TrayError> {
    Icon::from_rgba(icon_rgba(mode, theme), ICON_SIZE, ICON_SIZE).map_err(TrayError::IconLoad)
}
