use crate::core::model::QuestionOption;
use crate::core::numbering::QUESTION_ALPHABET;

/// Option text outside these bounds is treated as a false-positive
/// marker match and dropped.
const MIN_OPTION_LEN: usize = 2;
const MAX_OPTION_LEN: usize = 199;

#[derive(Debug, Clone, PartialEq)]
pub struct Segmented {
    pub stem: String,
    pub options: Vec<QuestionOption>,
}

/// Splits raw OCR text into a question stem and ordered options.
///
/// Markers of the form `(A)`..`(E)` anchor the split. Scanning is a
/// single left-to-right pass: SCANNING_STEM until the first marker,
/// then IN_OPTION(letter), advancing only on markers that come later
/// in the alphabet than the current letter. Out-of-order or repeated
/// markers stay part of the surrounding text, so letters never repeat
/// in the result.
#[derive(Debug, Clone)]
pub struct TextSegmenter {
    stem_fraction: f32,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    start: usize,
    body: usize,
    letter_idx: usize,
}

impl TextSegmenter {
    pub fn new(stem_fraction: f32) -> Self {
        Self { stem_fraction }
    }

    pub fn segment(&self, raw: &str) -> Segmented {
        let markers = find_markers(raw);

        let Some(first) = markers.first() else {
            return Segmented {
                stem: self.free_response_stem(raw),
                options: Vec::new(),
            };
        };

        let stem = normalize(&raw[..first.start]);
        let mut options = Vec::new();

        let mut current: Option<Marker> = None;
        for marker in &markers {
            match current {
                None => current = Some(*marker),
                Some(open) if marker.letter_idx > open.letter_idx => {
                    push_option(&mut options, raw, open, marker.start);
                    current = Some(*marker);
                }
                // Repeated or out-of-order marker: part of the text.
                Some(_) => {}
            }
        }
        if let Some(open) = current {
            push_option(&mut options, raw, open, raw.len());
        }

        Segmented { stem, options }
    }

    /// No structural anchor: keep the leading fraction of lines to
    /// avoid sweeping trailing footer noise into the stem.
    fn free_response_stem(&self, raw: &str) -> String {
        let lines: Vec<&str> = raw.split('\n').collect();
        let cutoff = (lines.len() as f32 * self.stem_fraction) as usize;
        normalize(&lines[..cutoff.min(lines.len())].join(" "))
    }
}

fn find_markers(text: &str) -> Vec<Marker> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;
    while i + 3 <= bytes.len() {
        if bytes[i] == b'(' && bytes[i + 2] == b')' {
            let letter = (bytes[i + 1] as char).to_ascii_uppercase();
            if let Some(letter_idx) = QUESTION_ALPHABET.iter().position(|&l| l == letter) {
                markers.push(Marker {
                    start: i,
                    body: i + 3,
                    letter_idx,
                });
                i += 3;
                continue;
            }
        }
        i += 1;
    }
    markers
}

fn push_option(options: &mut Vec<QuestionOption>, raw: &str, open: Marker, end: usize) {
    let text = normalize(&raw[open.body..end]);
    let len = text.chars().count();
    if (MIN_OPTION_LEN..=MAX_OPTION_LEN).contains(&len) {
        options.push(QuestionOption {
            letter: QUESTION_ALPHABET[open.letter_idx],
            text,
            is_correct: false,
        });
    }
}

/// Collapses whitespace runs and applies fixed OCR confusion fixes.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    // Vertical bar is a frequent misread of the letter I; a stray O
    // glued to a zero is a misread zero.
    collapsed.replace('|', "I").replace("0O", "00")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segmenter() -> TextSegmenter {
        TextSegmenter::new(0.7)
    }

    #[test]
    fn splits_stem_and_five_options() {
        let result =
            segmenter().segment("Find x. (A) one (B) two (C) three (D) four (E) five");
        assert_eq!(result.stem, "Find x.");
        let letters: Vec<char> = result.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'B', 'C', 'D', 'E']);
        let texts: Vec<&str> = result.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four", "five"]);
        assert!(result.options.iter().all(|o| !o.is_correct));
    }

    #[test]
    fn no_marker_means_free_response() {
        let raw = "How many squares\nare in this figure\nwhen folded twice\nName: ______\nScore: ____";
        let result = segmenter().segment(raw);
        assert!(result.options.is_empty());
        assert_eq!(result.stem, "How many squares are in this figure when folded twice");
    }

    #[test]
    fn normalizes_whitespace_and_confusions() {
        let result = segmenter().segment("What  is\n|V   plus 2?\t(A) s|x (B) ten");
        assert_eq!(result.stem, "What is IV plus 2?");
        assert_eq!(result.options[0].text, "sIx");
    }

    #[test]
    fn rejects_oversized_option_windows() {
        let long_tail = "x".repeat(300);
        let result = segmenter().segment(&format!("Stem here. (A) {long_tail}"));
        assert_eq!(result.stem, "Stem here.");
        assert!(result.options.is_empty());
    }

    #[test]
    fn rejects_single_character_options() {
        let result = segmenter().segment("Stem. (A) 7 (B) 12");
        let letters: Vec<char> = result.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['B']);
    }

    #[test]
    fn skips_missing_letters_without_padding() {
        let result = segmenter().segment("Pick one. (A) red (C) blue (E) green");
        let letters: Vec<char> = result.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'C', 'E']);
        assert_eq!(result.options[1].text, "blue");
    }

    #[test]
    fn ignores_out_of_order_markers() {
        let result = segmenter().segment("Stem. (B) first (A) noise (C) last");
        let letters: Vec<char> = result.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['B', 'C']);
        assert_eq!(result.options[0].text, "first (A) noise");
    }

    #[test]
    fn matches_lowercase_markers() {
        let result = segmenter().segment("Stem. (a) one (b) two");
        let letters: Vec<char> = result.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'B']);
    }

    #[test]
    fn never_fails_on_garbage() {
        let result = segmenter().segment("");
        assert_eq!(result.stem, "");
        assert!(result.options.is_empty());

        // Marker with an empty window is rejected, not emitted.
        let result = segmenter().segment("((()))(A(B)");
        assert_eq!(result.stem, "((()))(A");
        assert!(result.options.is_empty());
    }

    #[test]
    fn stem_fraction_is_respected() {
        let raw = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj";
        let half = TextSegmenter::new(0.5).segment(raw);
        assert_eq!(half.stem, "a b c d e");
    }
}
