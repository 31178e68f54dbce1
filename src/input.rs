use crate::billing::{choose, Parties, StayRequest, TourRequest, TourType};
use crate::output::Format;
use inquire::{error::InquireError, Text};
use strum::IntoEnumIterator;

type InputResult<T> = Result<T, InquireError>;

const TAX_PROMPT: &str =
    "Enter the tax rate (as a percentage, e.g., 13 for 13%):";

// Answers are returned as typed, checking them is up to the caller.
fn ask(prompt: &str) -> InputResult<String> {
    Text::new(prompt).prompt()
}

fn menu<T: IntoEnumIterator + ToString>(heading: &str) {
    println!("\n{}", heading);
    for (i, item) in T::iter().enumerate() {
        println!("{}. {}", i + 1, item.to_string());
    }
}

pub fn parties() -> InputResult<Parties> {
    let customer = ask("Enter the name of the customer:")?;
    let agency = ask("Enter the name of the agency (code name):")?;
    let agent = ask("Enter the name of the reservations agent:")?;
    Ok(Parties {
        customer,
        agency,
        agent,
    })
}

/// Ask for a stay. The simple proforma skips the room type and the tax rate.
pub fn stay(detailed: bool) -> InputResult<StayRequest> {
    let parties = parties()?;
    let room_type = if detailed {
        Some(ask("Enter the type of room (e.g., Single, Double, Suite):")?)
    } else {
        None
    };
    let people = ask("Enter the number of people:")?;
    let nightly_rate =
        ask("Enter the price per night per person (in USD):")?;
    let tax_rate = if detailed { Some(ask(TAX_PROMPT)?) } else { None };
    let from = ask("Enter the start date of the stay (YYYY-MM-DD):")?;
    let until = ask("Enter the end date of the stay (YYYY-MM-DD):")?;

    Ok(StayRequest {
        parties,
        room_type,
        people,
        nightly_rate,
        tax_rate,
        from,
        until,
    })
}

pub fn tour() -> InputResult<TourRequest> {
    let parties = parties()?;

    menu::<TourType>("Select the type of tour:");
    let tour = ask("Enter the number corresponding to the tour type:")?;
    let time = ask("Enter the time of the tour (HH:MM, 24-hour format):")?;
    let participants = ask("Enter the number of participants:")?;

    let price_prompt = match choose::<TourType>(&tour) {
        Ok(tour) => {
            format!("Enter the price per person for the {} tour (in USD):", tour)
        }
        Err(_) => "Enter the price per person for the tour (in USD):".to_string(),
    };
    let price = ask(&price_prompt)?;
    let tax_rate = ask(TAX_PROMPT)?;

    Ok(TourRequest {
        parties,
        tour,
        time,
        participants,
        price,
        tax_rate,
    })
}

pub fn format() -> InputResult<String> {
    menu::<Format>("Choose the file format to save:");
    ask("Enter the number corresponding to your choice:")
}
