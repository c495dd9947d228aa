use crate::library::{BookRecord, Library};

/// What the result area should show for a query.
#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Empty query: fall back to the quote carousel.
    Default,
    NoResults,
    Matches(Vec<&'a BookRecord>),
}

pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive title prefix match, in dataset order.
pub fn search<'a>(library: &'a Library, query: &str) -> SearchOutcome<'a> {
    let needle = normalize(query);
    if needle.is_empty() {
        return SearchOutcome::Default;
    }

    let matches: Vec<&BookRecord> = library
        .books()
        .iter()
        .filter(|b| b.title.to_lowercase().starts_with(&needle))
        .collect();

    if matches.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Matches(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            synopsis: String::new(),
            external_link: String::new(),
            quote: None,
        }
    }

    fn library() -> Library {
        Library::new(vec![
            book("Duna"),
            book("O Duque"),
            book("dune messiah"),
            book("Fundação"),
            book("DUST"),
        ])
    }

    fn titles<'a>(outcome: &SearchOutcome<'a>) -> Vec<&'a str> {
        match outcome {
            SearchOutcome::Matches(books) => books.iter().map(|b| b.title.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn prefix_match_ignores_case() {
        let library = library();
        let outcome = search(&library, "Du");
        assert_eq!(titles(&outcome), vec!["Duna", "dune messiah", "DUST"]);
    }

    #[test]
    fn substring_is_not_a_match() {
        let library = library();
        assert_eq!(search(&library, "uque"), SearchOutcome::NoResults);
    }

    #[test]
    fn query_is_trimmed() {
        let library = library();
        assert_eq!(titles(&search(&library, "  fUN  ")), vec!["Fundação"]);
    }

    #[test]
    fn empty_or_blank_query_is_default() {
        let library = library();
        assert_eq!(search(&library, ""), SearchOutcome::Default);
        assert_eq!(search(&library, "   "), SearchOutcome::Default);
        assert_eq!(search(&Library::default(), ""), SearchOutcome::Default);
    }

    #[test]
    fn no_match_yields_no_results() {
        let library = library();
        assert_eq!(search(&library, "zzz"), SearchOutcome::NoResults);
    }

    #[test]
    fn non_ascii_titles_fold() {
        let library = Library::new(vec![book("Ébano")]);
        assert_eq!(titles(&search(&library, "éB")), vec!["Ébano"]);
    }
}
