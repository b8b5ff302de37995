//! Read-time estimate

use super::Section;

/// Whitespace-delimited words in a string
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words across every section heading and every body block's text
pub fn total_word_count(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| {
            let body: usize = section
                .body
                .iter()
                .filter_map(|block| block.text())
                .map(count_words)
                .sum();
            count_words(&section.heading) + body
        })
        .sum()
}

/// Minutes to read `words`, rounded up, never less than one
pub fn read_time_minutes(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RichTextBlock;
    use serde_json::json;

    fn section(heading: &str, texts: &[&str]) -> Section {
        Section {
            heading: heading.to_string(),
            body: texts
                .iter()
                .map(|t| RichTextBlock(json!({ "type": "paragraph", "text": t, "spans": [] })))
                .collect(),
        }
    }

    #[test]
    fn test_hello_intro_example() {
        let sections = vec![section("Intro", &["a b c d e"])];
        assert_eq!(total_word_count(&sections), 6);
        assert_eq!(read_time_minutes(6, 200), 1);
    }

    #[test]
    fn test_sums_headings_and_bodies() {
        let sections = vec![
            section("Primeira parte", &["um dois três", "quatro"]),
            section("Segunda", &["  cinco\n seis\tsete  "]),
        ];
        // 2 + 3 + 1 + 1 + 3
        assert_eq!(total_word_count(&sections), 10);
    }

    #[test]
    fn test_blocks_without_text_count_zero() {
        let mut s = section("Imagem", &[]);
        s.body.push(RichTextBlock(json!({
            "type": "image",
            "url": "https://images.example/a.png",
            "alt": "uma imagem bonita"
        })));
        assert_eq!(total_word_count(&[s]), 1);
    }

    #[test]
    fn test_read_time_rounds_up() {
        assert_eq!(read_time_minutes(200, 200), 1);
        assert_eq!(read_time_minutes(201, 200), 2);
        assert_eq!(read_time_minutes(1000, 200), 5);
    }

    #[test]
    fn test_read_time_minimum_one() {
        assert_eq!(read_time_minutes(0, 200), 1);
        assert_eq!(total_word_count(&[]), 0);
    }

    #[test]
    fn test_read_time_monotonic() {
        let mut last = 0;
        for words in 0..2_000 {
            let minutes = read_time_minutes(words, 200);
            assert!(minutes >= last);
            last = minutes;
        }
    }
}
