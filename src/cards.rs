use std::fmt;

use crate::library::BookRecord;

pub const LINK_LABEL: &str = "View on Goodreads";

/// A flip card: title on the front, synopsis and link on the back.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub title: String,
    pub back: CardBack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardBack {
    pub synopsis: String,
    pub link: String,
    pub link_label: &'static str,
}

impl From<&BookRecord> for Card {
    fn from(book: &BookRecord) -> Self {
        Card {
            title: book.title.clone(),
            back: CardBack {
                synopsis: book.synopsis.clone(),
                link: book.external_link.clone(),
                link_label: LINK_LABEL,
            },
        }
    }
}

pub fn render_cards<'a, I>(books: I) -> Vec<Card>
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    books.into_iter().map(Card::from).collect()
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌ {}", self.title)?;
        writeln!(f, "│ {}", self.back.synopsis)?;
        write!(f, "└ {}: {}", self.back.link_label, self.back.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_card_per_record_in_order() {
        let books = vec![
            BookRecord {
                title: "Duna".into(),
                synopsis: "Areia.".into(),
                external_link: "https://example.org/duna".into(),
                quote: Some("q".into()),
            },
            BookRecord {
                title: "Solaris".into(),
                synopsis: "Oceano.".into(),
                external_link: "https://example.org/solaris".into(),
                quote: None,
            },
        ];
        let cards = render_cards(&books);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Duna");
        assert_eq!(cards[1].back.synopsis, "Oceano.");
        assert_eq!(cards[1].back.link, "https://example.org/solaris");
        assert_eq!(cards[0].back.link_label, LINK_LABEL);
    }

    #[test]
    fn display_shows_both_faces() {
        let card = Card::from(&BookRecord {
            title: "Duna".into(),
            synopsis: "Areia.".into(),
            external_link: "https://example.org/duna".into(),
            quote: None,
        });
        let text = card.to_string();
        assert!(text.contains("Duna"));
        assert!(text.contains("Areia."));
        assert!(text.contains("https://example.org/duna"));
    }
}
