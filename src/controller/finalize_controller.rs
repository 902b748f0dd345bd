use std::io::{BufRead, Write};
use tracing::warn;
use crate::helpers::console::Console;
use crate::helpers::map::{map_url, MapOpener};
use crate::models::reference::{find_reference, ReferenceEntry};
use crate::models::restaurant::RestaurantRecord;

pub const PREVIEW_LIMIT: usize = 50;

/// Shows the remaining candidates, settles on one and offers the follow-up actions.
/// Returns the restaurant the user ended up with.
pub fn finalize<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    candidates: &[RestaurantRecord],
    references: &[ReferenceEntry],
    map_opener: &dyn MapOpener,
) -> anyhow::Result<Option<RestaurantRecord>> {
    console.blank()?;
    console.say("Final Results")?;
    console.say("---------------------------")?;
    for (i, record) in candidates.iter().take(PREVIEW_LIMIT).enumerate() {
        console.say(format!("{}. {}", i, record.summary()))?;
    }

    let chosen = match candidates.len() {
        0 => {
            console.say("No restaurants matched your filters.")?;
            console.say("Session Ended")?;
            return Ok(None);
        }
        1 => &candidates[0],
        count => {
            console.blank()?;
            let index = console.ask_until("Please pick a number of a restaurant: ", |answer| {
                match answer.parse::<usize>() {
                    Ok(index) if index < count => Ok(index),
                    _ => Err("Invalid input. Please enter a valid number.".to_string()),
                }
            })?;
            &candidates[index]
        }
    };

    console.blank()?;
    if console.confirm("Would you like to see if your restaurant is part of Eater's Top Restaurants?")? {
        cross_reference(console, references, chosen)?;
    } else {
        console.say("Understood.")?;
    }

    if console.confirm("Would you like to get directions to this restaurant?")? {
        directions(console, map_opener, chosen)?;
    } else {
        console.blank()?;
        console.say("Thanks for playing!")?;
    }

    console.say("Session Ended")?;
    Ok(Some(chosen.clone()))
}

/// Reports whether `chosen` is on the reference list and optionally prints its details.
pub fn cross_reference<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    references: &[ReferenceEntry],
    chosen: &RestaurantRecord,
) -> anyhow::Result<bool> {
    let entry = match find_reference(references, &chosen.name) {
        Some(entry) => entry,
        None => {
            console.say("Not Found in Top Restaurants")?;
            return Ok(false);
        }
    };

    console.say("Found in Top Restaurants!")?;
    if console.confirm("Do you want to learn more?")? {
        for line in entry.details() {
            console.say(line)?;
        }
    } else {
        console.say("Okay!")?;
    }
    Ok(true)
}

fn directions<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    map_opener: &dyn MapOpener,
    chosen: &RestaurantRecord,
) -> anyhow::Result<()> {
    let location = match chosen.geometry {
        Some(location) => location,
        None => {
            console.say(format!("Sorry, there are no coordinates for {}.", chosen.name))?;
            return Ok(());
        }
    };

    let url = map_url(location);
    if let Err(e) = map_opener.open(&url) {
        warn!("Could not open the map due to: {:#}", e);
        console.say(format!("Could not open a browser, the map is at {}", url))?;
    }
    Ok(())
}
