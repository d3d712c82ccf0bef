// src/domain/template.rs

use super::ListingRecord;
use crate::errors::{NotifierError, Result};

/// Layout used when the configuration does not provide one.
pub const DEFAULT_MESSAGE: &str = "{title}\n\
Zimmer: {rooms}\n\
Größe: {size}\n\
Preis: {price}\n\
Warmmiete: {rent_warm}\n\
Ort: {address}\n\
{durations}\n\
\n\
{url}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Title,
    Rooms,
    Size,
    Price,
    RentWarm,
    Url,
    Address,
    Durations,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "title" => Placeholder::Title,
            "rooms" => Placeholder::Rooms,
            "size" => Placeholder::Size,
            "price" => Placeholder::Price,
            "rent_warm" => Placeholder::RentWarm,
            "url" => Placeholder::Url,
            "address" => Placeholder::Address,
            "durations" => Placeholder::Durations,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Placeholder::Title => "title",
            Placeholder::Rooms => "rooms",
            Placeholder::Size => "size",
            Placeholder::Price => "price",
            Placeholder::RentWarm => "rent_warm",
            Placeholder::Url => "url",
            Placeholder::Address => "address",
            Placeholder::Durations => "durations",
        }
    }

    /// Optional placeholders render as "" when the listing lacks them,
    /// the rest make the render fail.
    fn is_optional(self) -> bool {
        matches!(self, Placeholder::RentWarm | Placeholder::Durations)
    }

    fn value(self, listing: &ListingRecord) -> Option<&str> {
        match self {
            Placeholder::Title => listing.title.as_deref(),
            Placeholder::Rooms => listing.rooms.as_deref(),
            Placeholder::Size => listing.size.as_deref(),
            Placeholder::Price => listing.price.as_deref(),
            Placeholder::RentWarm => listing.rent_warm.as_deref(),
            Placeholder::Url => listing.url.as_deref(),
            Placeholder::Address => listing.address.as_deref(),
            Placeholder::Durations => listing.durations.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Field(Placeholder),
}

/// A parsed announcement template with `{name}` placeholders.
///
/// `{{` and `}}` are literal braces. Names the template does not know
/// (`{foo}`, `{price:>8}`) are kept verbatim in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    pieces: Vec<Piece>,
}

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(NotifierError::Template(format!(
                            "unclosed '{{' at byte {pos}"
                        )));
                    }

                    match Placeholder::parse(&name) {
                        Some(field) => {
                            if !literal.is_empty() {
                                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                            }
                            pieces.push(Piece::Field(field));
                        }
                        None => {
                            literal.push('{');
                            literal.push_str(&name);
                            literal.push('}');
                        }
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { pieces })
    }

    /// Fill the template from `listing`. The result is not trimmed.
    pub fn render(&self, listing: &ListingRecord) -> Result<String> {
        let mut out = String::new();

        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field(field) => match field.value(listing) {
                    Some(value) => out.push_str(value),
                    None if field.is_optional() => {}
                    None => return Err(NotifierError::MissingField(field.name())),
                },
            }
        }

        Ok(out)
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        // The built-in layout is known to parse.
        Self::parse(DEFAULT_MESSAGE).unwrap_or(Self { pieces: Vec::new() })
    }
}
