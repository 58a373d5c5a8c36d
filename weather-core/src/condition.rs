use std::fmt;

/// Closed set of weather conditions the application knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConditionCategory {
    #[default]
    Unknown,
    Snow,
    Rain,
    Clear,
    Clouds,
    Drizzle,
    Thunderstorm,
    Fog,
    Haze,
    Dust,
    Tornado,
    Squall,
}

impl ConditionCategory {
    /// Classify a raw condition code reported by a weather backend.
    ///
    /// Matching is case-insensitive. Codes outside the known set map to
    /// [`ConditionCategory::Unknown`]; this never fails.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "SNOW" => Self::Snow,
            "RAIN" => Self::Rain,
            "CLEAR" => Self::Clear,
            "CLOUDS" => Self::Clouds,
            "DRIZZLE" => Self::Drizzle,
            "THUNDERSTORM" => Self::Thunderstorm,
            "FOG" | "MIST" => Self::Fog,
            "HAZE" => Self::Haze,
            "DUST" | "ASH" | "SMOKE" | "SAND" => Self::Dust,
            "TORNADO" => Self::Tornado,
            "SQUALL" => Self::Squall,
            _ => Self::Unknown,
        }
    }

    /// Canonical upper-case name, as stored in the weather log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Snow => "SNOW",
            Self::Rain => "RAIN",
            Self::Clear => "CLEAR",
            Self::Clouds => "CLOUDS",
            Self::Drizzle => "DRIZZLE",
            Self::Thunderstorm => "THUNDERSTORM",
            Self::Fog => "FOG",
            Self::Haze => "HAZE",
            Self::Dust => "DUST",
            Self::Tornado => "TORNADO",
            Self::Squall => "SQUALL",
        }
    }

    /// Russian display label.
    pub fn label_ru(&self) -> &'static str {
        match self {
            Self::Unknown => "Нет данных",
            Self::Snow => "Снег",
            Self::Rain => "Дождь",
            Self::Clear => "Ясно",
            Self::Clouds => "Облачно",
            Self::Drizzle => "Изморозь",
            Self::Thunderstorm => "Гроза",
            Self::Fog => "Туман",
            Self::Haze => "Легкий туман",
            Self::Dust => "Пыль",
            Self::Tornado => "Торнадо",
            Self::Squall => "Шквал",
        }
    }

    pub const fn all() -> &'static [ConditionCategory] {
        &[
            Self::Unknown,
            Self::Snow,
            Self::Rain,
            Self::Clear,
            Self::Clouds,
            Self::Drizzle,
            Self::Thunderstorm,
            Self::Fog,
            Self::Haze,
            Self::Dust,
            Self::Tornado,
            Self::Squall,
        ]
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
