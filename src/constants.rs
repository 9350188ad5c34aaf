//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gemini REST API base and model id
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Environment variable holding the API credential, read at call time
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// A built-in example diagram offered on the picker screen
pub struct PresetBlueprint {
    pub id: &'static str,
    pub url: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const PRESET_BLUEPRINTS: &[PresetBlueprint] = &[
    PresetBlueprint {
        id: "b1",
        url: "https://i.imgur.com/g8ed1lm.jpeg",
        label: "Vision Pro",
        description: "Next-gen spatial computing architecture",
    },
    PresetBlueprint {
        id: "b2",
        url: "https://i.imgur.com/f3JIygm.jpeg",
        label: "iPhone 17 Pro Max",
        description: "Cutting-edge mobile hardware integration",
    },
    PresetBlueprint {
        id: "b3",
        url: "https://i.imgur.com/uBKJ9VB.jpeg",
        label: "Nintendo Switch 2",
        description: "Hybrid gaming console component layout",
    },
    PresetBlueprint {
        id: "b4",
        url: "https://i.imgur.com/BLqN68F.jpeg",
        label: "PlayStation 5",
        description: "Advanced console cooling and processing unit",
    },
];
