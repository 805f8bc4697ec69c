//! Whole-word keyword matching shared by the content and image tables.

/// Lower-cased alphanumeric words of `text`.
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// True when `phrase` occurs in `words` as whole, consecutive words.
pub fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    !needle.is_empty()
        && words
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
}

pub fn matches_any(words: &[String], phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(words, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_whole_words_only() {
        let w = words("Said the gardener");
        assert!(!contains_phrase(&w, "ai"));
        let w = words("Applied AI in retail");
        assert!(contains_phrase(&w, "ai"));
        let w = words("Intro to web development, part 2");
        assert!(contains_phrase(&w, "web development"));
        assert!(!contains_phrase(&w, "development web"));
        assert!(!contains_phrase(&w, ""));
    }

    #[test]
    fn matches_any_checks_every_phrase() {
        let w = words("Space rockets and NASA");
        assert!(matches_any(&w, &["astronomy", "nasa"]));
        assert!(!matches_any(&w, &["ocean"]));
    }
}
