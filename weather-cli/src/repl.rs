use std::io::{self, BufRead, Write};
use weather_core::{WeatherSession, present};

const BANNER: &str = "\
╔════════════════════════════════════════════════════╗
║                                                    ║
║               WEATHER INFORMATION APP              ║
║                                                    ║
║            Get real-time weather updates           ║
║              for any city in the world             ║
║                                                    ║
╚════════════════════════════════════════════════════╝";

const PROMPT: &str = "Enter city name: ";
const GOODBYE: &str = "Thank you for using the Weather App. Goodbye!";

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Quit,
    History,
    Empty,
    Query(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Input::Empty
        } else if line.eq_ignore_ascii_case("quit") {
            Input::Quit
        } else if line.eq_ignore_ascii_case("history") {
            Input::History
        } else {
            Input::Query(line)
        }
    }
}

/// Blocking prompt loop. Returns on `quit` or end of input.
///
/// Lookup failures are printed and the loop carries on.
pub async fn run<R, W>(session: &mut WeatherSession, mut input: R, out: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "{BANNER}")?;
    writeln!(out, "Type 'history' to see recent searches or 'quit' to exit.")?;

    let mut line = String::new();
    loop {
        write!(out, "\n{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "{GOODBYE}")?;
            return Ok(());
        }

        match Input::parse(&line) {
            Input::Quit => {
                writeln!(out, "{GOODBYE}")?;
                return Ok(());
            }
            Input::Empty => writeln!(out, "{}", present::EMPTY_QUERY)?,
            Input::History => {
                writeln!(out, "{}", present::history_report(session.history(), None))?
            }
            Input::Query(city) => {
                writeln!(out, "Fetching weather data for {city}...")?;
                out.flush()?;

                let result = session.lookup(city).await;
                writeln!(out, "{}", present::render(&result))?;
            }
        }
    }
}
