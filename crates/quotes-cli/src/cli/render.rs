use std::io::{self, Write};

use quotes_core::{CoreEvent, QuoteDisplay};

pub fn render_display(display: &QuoteDisplay) -> String {
    match display {
        QuoteDisplay::Quote(quote) => format!("\"{}\"\n    -- {}", quote.text, quote.category),
        QuoteDisplay::NoQuotes => "No quotes available. Please add a quote first.".to_string(),
        QuoteDisplay::NoQuotesInCategory(category) => {
            format!("No quotes in category \"{}\".", category)
        }
    }
}

pub fn render_categories(categories: &[String], selected: &str) -> String {
    let listed: Vec<String> = categories
        .iter()
        .map(|c| {
            if c == selected {
                format!("[{}]", c)
            } else {
                c.clone()
            }
        })
        .collect();
    format!("Categories: {}", listed.join(", "))
}

/// Write events for a terminal. Error statuses go to `err`, everything else to `out`.
/// Returns true if any error status was written.
pub fn print_events<O: Write, E: Write>(
    out: &mut O,
    err: &mut E,
    events: &[CoreEvent],
) -> io::Result<bool> {
    let mut had_error = false;
    for event in events {
        match event {
            CoreEvent::Display(display) => writeln!(out, "{}", render_display(display))?,
            CoreEvent::Categories {
                categories,
                selected,
            } => writeln!(out, "{}", render_categories(categories, selected))?,
            CoreEvent::Status { message, is_error } => {
                if *is_error {
                    had_error = true;
                    writeln!(err, "error: {}", message)?;
                } else {
                    writeln!(out, "{}", message)?;
                }
            }
            // Written to a file by the caller
            CoreEvent::Exported { .. } => {}
        }
    }
    Ok(had_error)
}
