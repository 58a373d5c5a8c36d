use crate::WeatherObservation;

pub const TIME_FORMAT: &str = "%H:%M";

/// Render an observation as the five-line console report.
pub fn format_weather(obs: &WeatherObservation) -> String {
    format!(
        "Location: {}\n\
         Temperature: {}°C\n\
         Weather condition: {}\n\
         Sunrise: {}\n\
         Sunset: {}",
        capitalize(&obs.location),
        obs.temperature,
        obs.description.name().to_lowercase(),
        obs.sunrise.format(TIME_FORMAT),
        obs.sunset.format(TIME_FORMAT),
    )
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
