//! Interactive session: restore the last search, then loop over prompts.

use std::fmt;

use inquire::{InquireError, Select, Text};
use weathernow_core::{PlaceQuery, SearchPipeline, SearchState};

use crate::render;

#[derive(Debug, Clone, PartialEq)]
enum Choice {
    NewSearch,
    Recent(String),
    Quit,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::NewSearch => f.write_str("Search for a city..."),
            Choice::Recent(name) => f.write_str(name),
            Choice::Quit => f.write_str("Quit"),
        }
    }
}

fn choices(recent: impl Iterator<Item = String>) -> Vec<Choice> {
    let mut out = vec![Choice::NewSearch];
    out.extend(recent.map(Choice::Recent));
    out.push(Choice::Quit);
    out
}

pub async fn run(pipeline: &SearchPipeline) -> anyhow::Result<()> {
    println!("Weather Now");

    match pipeline.start().await {
        Some(state) => print!("{}", render::state(&state)),
        None => print!("{}", render::state(&pipeline.state())),
    }

    loop {
        let options = choices(pipeline.recent().iter().map(str::to_string));

        let choice = match Select::new("What next?", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let query = match choice {
            Choice::Quit => break,
            Choice::Recent(name) => PlaceQuery::new(&name),
            Choice::NewSearch => match Text::new("City:").prompt() {
                Ok(input) => PlaceQuery::new(&input),
                Err(InquireError::OperationCanceled) => continue,
                Err(InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err.into()),
            },
        };

        // Blank input is simply ignored.
        let Some(query) = query else { continue };

        print!("{}", render::state(&SearchState::Loading));
        let state = pipeline.search(&query).await;
        print!("{}", render::state(&state));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_wrap_recent_searches() {
        let options = choices(["Paris".to_string(), "Tokyo".to_string()].into_iter());
        assert_eq!(
            options,
            [
                Choice::NewSearch,
                Choice::Recent("Paris".into()),
                Choice::Recent("Tokyo".into()),
                Choice::Quit
            ]
        );
        assert_eq!(options[1].to_string(), "Paris");
    }

    #[test]
    fn choices_without_history() {
        assert_eq!(choices(std::iter::empty()), [Choice::NewSearch, Choice::Quit]);
    }
}
