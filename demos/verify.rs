//! Geocodes CRM address text given on the command line.
//!
//! Needs `GOOGLE_API_KEY` in the environment or a `.env` file.

use crmaddr::{extract, verify, GoogleGeocoder};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        eprintln!("usage: verify <address text>");
        return ExitCode::FAILURE;
    }

    let geocoder = match GoogleGeocoder::from_env() {
        Ok(geocoder) => geocoder,
        Err(err) => {
            eprintln!("cannot create geocoder: {err}");
            return ExitCode::FAILURE;
        }
    };

    let addr = extract(&text);
    println!("query:      {}", addr.to_query_string());

    match verify(&addr, &geocoder) {
        Ok(result) => {
            println!("geocoded:   {}", result.geocoded.formatted_address);
            println!("coordinate: {}", result.geocoded.coordinate);
            println!("precision:  {:?}", result.geocoded.precision);
            if let Some(cmp) = result.comparison {
                println!(
                    "distance:   {} ({})",
                    cmp.formatted_distance(),
                    cmp.accuracy
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("verification failed: {err}");
            ExitCode::FAILURE
        }
    }
}
