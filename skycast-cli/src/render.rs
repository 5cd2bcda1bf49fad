//! Terminal rendering of a committed view state.

use chrono::NaiveDate;
use skycast_core::{ForecastSnapshot, ResolvedLocation, Status, ViewState};

use crate::codes;

/// Hours of the hourly strip shown under the current conditions.
const HOURLY_SHOWN: usize = 12;

pub fn view(state: &ViewState) {
    match state.status {
        Status::Idle | Status::Loading => println!("Loading..."),
        Status::Errored(kind) => eprintln!("error: {}", kind.user_message()),
        Status::Ready => {
            if let (Some(location), Some(snapshot)) = (&state.location, &state.snapshot) {
                print_ready(location, snapshot);
            }
        }
    }
}

fn print_ready(location: &ResolvedLocation, snapshot: &ForecastSnapshot) {
    let unit = snapshot.unit;
    let current = &snapshot.current;

    println!("{}", location.label());
    println!(
        "{:.0}{}  {}",
        current.temperature,
        unit.symbol(),
        codes::describe(current.weather_code)
    );
    println!("Feels like {:.0}{}", current.apparent_temperature, unit.symbol());
    println!(
        "Wind {:.0} km/h   Humidity {:.0}%",
        current.wind_speed, current.humidity
    );

    let now = chrono::Local::now().naive_local();
    let upcoming: Vec<_> = snapshot
        .hourly
        .iter()
        .filter(|entry| entry.time >= now)
        .take(HOURLY_SHOWN)
        .collect();

    if !upcoming.is_empty() {
        println!();
        println!("Next hours:");
        for entry in upcoming {
            println!(
                "  {}  {:>6.1}{}  {}",
                entry.time.format("%H:%M"),
                entry.temperature,
                unit.symbol(),
                codes::describe(entry.weather_code)
            );
        }
    }

    if !snapshot.daily.is_empty() {
        println!();
        println!("Daily:");
        for day in &snapshot.daily {
            println!(
                "  {}  {:>5.1}{} / {:>5.1}{}  rain {:>3}%  {}",
                day_label(day.date),
                day.temperature_max,
                unit.symbol(),
                day.temperature_min,
                unit.symbol(),
                day.precipitation_probability,
                codes::describe(day.weather_code)
            );
        }
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format("%a %d %b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_label_shows_weekday_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date");
        assert_eq!(day_label(date), "Fri 07 Aug");
    }
}
