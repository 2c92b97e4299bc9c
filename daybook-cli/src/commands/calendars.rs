use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::session::Session;

pub fn run(session: &Session) -> Result<()> {
    println!(
        "{}",
        format!("Calendars in {}", session.daybook().display_path().display()).dimmed()
    );

    let selected = session.calendar().title();
    for calendar in session.calendars() {
        let count = format!("({} events)", calendar.len());
        if calendar.title() == selected {
            println!("{} {} {}", calendar.render().bold(), count.dimmed(), "*".green());
        } else {
            println!("{} {}", calendar.render(), count.dimmed());
        }
    }

    Ok(())
}
