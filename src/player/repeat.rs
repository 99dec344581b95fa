use crate::config::RepeatModeSetting;

/// Repeat control state. Each press of the control calls `advance`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// The transition taken on one press: `Off -> All -> One -> Off`.
    pub fn advance(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Badge drawn on the repeat control.
    pub fn marker(self) -> Option<char> {
        match self {
            Self::One => Some('1'),
            Self::Off | Self::All => None,
        }
    }

    /// Whether the control is highlighted.
    pub fn is_active(self) -> bool {
        self != Self::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(setting: RepeatModeSetting) -> Self {
        match setting {
            RepeatModeSetting::Off => Self::Off,
            RepeatModeSetting::All => Self::All,
            RepeatModeSetting::One => Self::One,
        }
    }
}
