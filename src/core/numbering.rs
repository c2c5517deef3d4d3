use std::fmt;

/// Letters assigned to questions within one contest, in order.
pub const QUESTION_ALPHABET: &[char] = &['A', 'B', 'C', 'D', 'E'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionId {
    pub contest: usize,
    pub letter: char,
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.contest, self.letter)
    }
}

/// Maps a 0-based page index to its contest number and question letter.
/// Pure and total: pages past the last complete group still get an
/// identifier, which callers should treat as provisional.
pub fn question_id(page_idx: usize, group_size: usize) -> QuestionId {
    debug_assert!(group_size > 0 && group_size <= QUESTION_ALPHABET.len());
    let contest = page_idx / group_size + 1;
    let letter = QUESTION_ALPHABET[page_idx % group_size];
    QuestionId { contest, letter }
}

/// Position of the letter within its group, 0-based.
pub fn letter_position(page_idx: usize, group_size: usize) -> usize {
    page_idx % group_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_ten_pages_cover_two_contests() {
        let ids: Vec<String> = (0..10).map(|i| question_id(i, 5).to_string()).collect();
        let expected = ["1A", "1B", "1C", "1D", "1E", "2A", "2B", "2C", "2D", "2E"];
        assert_eq!(ids, expected);
    }

    #[test]
    fn trailing_pages_still_get_identifiers() {
        assert_eq!(question_id(11, 5).to_string(), "3B");
    }

    #[test]
    fn respects_group_size() {
        assert_eq!(question_id(3, 3).to_string(), "2A");
        assert_eq!(question_id(5, 3).to_string(), "2C");
    }
}
