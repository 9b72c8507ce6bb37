//! Named viewport presets
//!
//! Fixed device configurations that can be selected by name instead of
//! spelling out a [`Viewport`]. The table is a process-wide constant.
//!
//! # Example
//!
//! ```rust
//! use screencraft::presets;
//!
//! let phone = presets::viewport_preset("mobile").unwrap();
//! assert_eq!((phone.width, phone.height), (375, 812));
//! assert!(presets::viewport_preset("smartwatch").is_err());
//! ```

use crate::error::{Error, Result};
use crate::types::Viewport;

/// 1920x1080 desktop
pub const DESKTOP: Viewport = Viewport::new(1920, 1080);

/// 2560x1440 desktop
pub const DESKTOP_HD: Viewport = Viewport::new(2560, 1440);

/// 1366x768 laptop
pub const LAPTOP: Viewport = Viewport::new(1366, 768);

pub const TABLET: Viewport = Viewport {
    width: 768,
    height: 1024,
    device_scale_factor: 1.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: true,
};

pub const TABLET_LANDSCAPE: Viewport = Viewport {
    width: 1024,
    height: 768,
    device_scale_factor: 1.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: true,
};

/// Generic portrait phone
pub const MOBILE: Viewport = Viewport {
    width: 375,
    height: 812,
    device_scale_factor: 1.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: false,
};

pub const MOBILE_LANDSCAPE: Viewport = Viewport {
    width: 812,
    height: 375,
    device_scale_factor: 1.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: true,
};

pub const IPHONE_14: Viewport = Viewport {
    width: 390,
    height: 844,
    device_scale_factor: 3.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: false,
};

pub const IPHONE_14_PRO_MAX: Viewport = Viewport {
    width: 430,
    height: 932,
    device_scale_factor: 3.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: false,
};

pub const PIXEL_7: Viewport = Viewport {
    width: 412,
    height: 915,
    device_scale_factor: 2.625,
    is_mobile: true,
    has_touch: true,
    is_landscape: false,
};

pub const IPAD_PRO: Viewport = Viewport {
    width: 1024,
    height: 1366,
    device_scale_factor: 2.0,
    is_mobile: true,
    has_touch: true,
    is_landscape: false,
};

/// All presets by name, in display order
pub const VIEWPORT_PRESETS: &[(&str, Viewport)] = &[
    ("desktop", DESKTOP),
    ("desktop_hd", DESKTOP_HD),
    ("laptop", LAPTOP),
    ("tablet", TABLET),
    ("tablet_landscape", TABLET_LANDSCAPE),
    ("mobile", MOBILE),
    ("mobile_landscape", MOBILE_LANDSCAPE),
    ("iphone_14", IPHONE_14),
    ("iphone_14_pro_max", IPHONE_14_PRO_MAX),
    ("pixel_7", PIXEL_7),
    ("ipad_pro", IPAD_PRO),
];

/// Names of all presets
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    VIEWPORT_PRESETS.iter().map(|(name, _)| *name)
}

/// Lookup a preset by name.
///
/// Unknown names fail with [`Error::Validation`] on field `viewport`, and the
/// message lists every valid name.
pub fn viewport_preset(name: &str) -> Result<Viewport> {
    VIEWPORT_PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, viewport)| *viewport)
        .ok_or_else(|| {
            Error::validation(
                format!(
                    "Unknown viewport preset: {}. Available presets: {}",
                    name,
                    preset_names().collect::<Vec<_>>().join(", ")
                ),
                "viewport",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_preset() {
        let viewport = viewport_preset("mobile").unwrap();
        assert_eq!(viewport.width, 375);
        assert_eq!(viewport.height, 812);
        assert!(viewport.is_mobile);
        assert!(viewport.has_touch);
        assert!(!viewport.is_landscape);
    }

    #[test]
    fn test_unknown_preset_lists_names() {
        let err = viewport_preset("smartwatch").unwrap_err();
        assert_eq!(err.field(), Some("viewport"));
        let message = err.message();
        assert!(message.contains("smartwatch"));
        for name in preset_names() {
            assert!(message.contains(name), "missing {} in {}", name, message);
        }
    }

    #[test]
    fn test_preset_table() {
        assert_eq!(VIEWPORT_PRESETS.len(), 11);

        let mut names = std::collections::HashSet::new();
        for name in preset_names() {
            assert!(names.insert(name));
        }

        assert_eq!(viewport_preset("pixel_7").unwrap().device_scale_factor, 2.625);
        assert_eq!(viewport_preset("desktop").unwrap(), Viewport::default());
    }
}
