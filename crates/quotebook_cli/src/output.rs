//! Plain-text and JSON rendering of command results.

use quotebook_core::{FileRef, Quote, TransferOutcome};
use serde::Serialize;

/// Renders results either as human-readable lines or as pretty JSON.
pub struct Printer {
    json: bool,
}

#[derive(Serialize)]
struct TransferView<'a> {
    destination: &'a str,
    source_ids: &'a [i64],
    copied: &'a [Quote],
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn quotes<'a>(&self, quotes: impl IntoIterator<Item = &'a Quote>) {
        let quotes = quotes.into_iter().collect::<Vec<_>>();
        if self.json {
            self.emit_json(&quotes);
            return;
        }
        if quotes.is_empty() {
            println!("no quotes");
            return;
        }
        for quote in quotes {
            println!("{}", format_quote_line(quote));
        }
    }

    pub fn quote(&self, quote: Option<&Quote>) {
        if self.json {
            self.emit_json(&quote);
            return;
        }
        match quote {
            Some(quote) => println!("{}", format_quote_card(quote)),
            None => println!("no quotes"),
        }
    }

    pub fn files(&self, files: &[FileRef]) {
        if self.json {
            self.emit_json(&files);
            return;
        }
        if files.is_empty() {
            println!("no collections");
        }
        for file in files {
            println!("{}", file.name);
        }
    }

    pub fn tags(&self, tags: &[String]) {
        if self.json {
            self.emit_json(&tags);
            return;
        }
        println!("{}", tags.join(" "));
    }

    pub fn transfer(&self, outcome: &TransferOutcome) {
        if self.json {
            self.emit_json(&TransferView {
                destination: &outcome.destination.name,
                source_ids: &outcome.source_ids,
                copied: &outcome.copied,
            });
            return;
        }
        for (source_id, copy) in outcome.source_ids.iter().zip(&outcome.copied) {
            println!(
                "#{source_id} -> {}#{}",
                outcome.destination.name, copy.id
            );
        }
    }

    pub fn message(&self, message: &str) {
        if self.json {
            self.emit_json(&serde_json::json!({ "message": message }));
            return;
        }
        println!("{message}");
    }

    fn emit_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: cannot encode output: {err}"),
        }
    }
}

/// One-line listing: `#id content | speaker | tags`.
pub fn format_quote_line(quote: &Quote) -> String {
    let mut line = format!("#{} {}", quote.id, first_line(&quote.content, 60));
    if !quote.speaker.is_empty() {
        line.push_str(&format!(" | {}", quote.speaker));
    }
    if !quote.tag.is_empty() {
        line.push_str(&format!(" [{}]", quote.tag));
    }
    line
}

/// Multi-line card used for a single random quote.
pub fn format_quote_card(quote: &Quote) -> String {
    let mut card = quote.content.clone();
    let attribution = [quote.speaker.as_str(), quote.note.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let mut footer = format!("- {attribution}");
    if !quote.date.is_empty() {
        footer.push_str(&format!(" ({})", quote.date));
    }
    card.push('\n');
    card.push_str(footer.trim_end());
    if !quote.tag.is_empty() {
        card.push_str(&format!("\ntags: {}", quote.tag));
    }
    if let Some(link) = &quote.link {
        card.push_str(&format!("\nlink: {link}"));
    }
    card
}

fn first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut shortened = line.chars().take(max_chars).collect::<String>();
    if line.chars().count() > max_chars || text.lines().nth(1).is_some() {
        shortened.push_str("...");
    }
    shortened
}

#[cfg(test)]
mod tests {
    use super::{format_quote_card, format_quote_line};
    use quotebook_core::QuoteDraft;

    #[test]
    fn line_includes_id_speaker_and_tags() {
        let quote = QuoteDraft::new("Hello")
            .with_speaker("Ann")
            .with_tag("fun")
            .into_new_quote(4);
        assert_eq!(format_quote_line(&quote), "#4 \"Hello\" | Ann [fun]");
    }

    #[test]
    fn card_shows_date_and_link() {
        let quote = QuoteDraft::new("Hi")
            .with_speaker("Ann")
            .with_date("1999")
            .with_link("https://example.com")
            .into_new_quote(1);
        assert_eq!(
            format_quote_card(&quote),
            "\"Hi\"\n- Ann (1999)\nlink: https://example.com"
        );
    }
}
