use crate::clock::TimeOfDay;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AnswerError {
    #[error("No time was found in your answer.\nPlease use the format hh:mm.")]
    NoMatch,
    #[error("Hour {0} is past 24.\nPlease use the format hh:mm.")]
    HourOutOfRange(u8),
    #[error("24 o'clock only exists as 24:00.\nPlease use the format hh:mm.")]
    MinutesPastMidnight,
}

/// A syntactically valid answer before the 12-hour comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAnswer {
    pub hour: u8,
    pub minute: u8,
}

impl ParsedAnswer {
    /// Answers are compared on the 12-hour dial, so 15:15 matches 3:15.
    pub fn matches(&self, expected: TimeOfDay) -> bool {
        (self.hour % 12, self.minute) == (expected.hour, expected.minute)
    }
}

/// Parses a free-text time guess.
///
/// The accepted shape is a 1-2 digit hour (a two digit hour starts with 0, 1
/// or 2), an optional single non-digit separator such as ':' or 'h', and
/// exactly two minute digits with the first in 0-5, anchored at both ends.
/// Hour 24 is only valid as 24:00.
pub fn parse_answer(s: &str) -> Result<ParsedAnswer, AnswerError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 3 {
        return Err(AnswerError::NoMatch);
    }

    let (head, tail) = chars.split_at(chars.len() - 2);
    if !(tail[0].is_ascii_digit() && ('0'..='5').contains(&tail[0]) && tail[1].is_ascii_digit()) {
        return Err(AnswerError::NoMatch);
    }
    let minute = (tail[0] as u8 - b'0') * 10 + (tail[1] as u8 - b'0');

    // Strip one optional non-digit separator before the minutes.
    let hour_digits = match head {
        [rest @ .., sep] if !sep.is_ascii_digit() => rest,
        rest => rest,
    };

    let hour = match hour_digits {
        [d] if d.is_ascii_digit() => *d as u8 - b'0',
        [d1, d2] if ('0'..='2').contains(d1) && d2.is_ascii_digit() => {
            (*d1 as u8 - b'0') * 10 + (*d2 as u8 - b'0')
        }
        _ => return Err(AnswerError::NoMatch),
    };

    if hour > 24 {
        return Err(AnswerError::HourOutOfRange(hour));
    }
    if hour == 24 && minute > 0 {
        return Err(AnswerError::MinutesPastMidnight);
    }

    Ok(ParsedAnswer { hour, minute })
}

/// One question and its judged outcome. Created per round, dropped when the
/// dialog closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizRound {
    pub expected: TimeOfDay,
    pub answer: ParsedAnswer,
    pub correct: bool,
}

/// Running score, threaded through the quiz loop and reported at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub correct: u32,
    pub wrong: u32,
}

impl ScoreTally {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }

    pub fn summary(&self) -> String {
        format!("You got {} of {} correct!", self.correct, self.total())
    }
}

/// The modal question prompt: an input line plus the validate/apply steps.
///
/// Lifecycle: open (editing) -> submit runs `validate`; a grammar failure
/// keeps the dialog open with a warning and the old input selected, a parse
/// runs `apply` and yields the judged round. Cancelling is handled by the
/// controller and scores nothing.
#[derive(Debug)]
pub struct QuestionDialog {
    expected: TimeOfDay,
    pub round: u32,
    pub input: String,
    pub warning: Option<AnswerError>,
    selected: bool,
}

impl QuestionDialog {
    /// The expected answer is required up front; there is no unseeded state.
    pub fn new(round: u32, expected: TimeOfDay) -> Self {
        Self {
            expected,
            round,
            input: String::new(),
            warning: None,
            selected: false,
        }
    }

    pub fn expected(&self) -> TimeOfDay {
        self.expected
    }

    pub fn title(&self) -> String {
        format!("Question #{}", self.round)
    }

    pub fn type_char(&mut self, c: char) {
        if self.selected {
            // A rejected answer is left selected; typing replaces it.
            self.input.clear();
            self.selected = false;
        }
        self.warning = None;
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        if self.selected {
            self.input.clear();
            self.selected = false;
        } else {
            self.input.pop();
        }
        self.warning = None;
    }

    pub fn validate(&self) -> Result<ParsedAnswer, AnswerError> {
        parse_answer(&self.input)
    }

    pub fn apply(&self, answer: ParsedAnswer) -> QuizRound {
        QuizRound {
            expected: self.expected,
            answer,
            correct: answer.matches(self.expected),
        }
    }

    /// Submit the current input. `None` keeps the dialog open with a
    /// warning; `Some` closes the input phase with a judged round.
    pub fn submit(&mut self) -> Option<QuizRound> {
        match self.validate() {
            Ok(answer) => Some(self.apply(answer)),
            Err(e) => {
                self.warning = Some(e);
                self.selected = true;
                None
            }
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_colon_separator() {
        let a = parse_answer("3:15").unwrap();
        assert_eq!(a, ParsedAnswer { hour: 3, minute: 15 });
        assert!(a.matches(TimeOfDay::new(3, 15)));
    }

    #[test]
    fn accepts_h_separator_and_no_separator() {
        assert_eq!(parse_answer("3h15").unwrap(), ParsedAnswer { hour: 3, minute: 15 });
        assert_eq!(parse_answer("315").unwrap(), ParsedAnswer { hour: 3, minute: 15 });
        assert_eq!(parse_answer("0315").unwrap(), ParsedAnswer { hour: 3, minute: 15 });
    }

    #[test]
    fn twenty_four_hour_answers_match_mod_twelve() {
        let a = parse_answer("15:15").unwrap();
        assert!(a.matches(TimeOfDay::new(3, 15)));
        let b = parse_answer("12:00").unwrap();
        assert!(b.matches(TimeOfDay::new(0, 0)));
    }

    #[test]
    fn midnight_as_2400_is_the_only_valid_24() {
        let a = parse_answer("24:00").unwrap();
        assert!(a.matches(TimeOfDay::new(0, 0)));
        assert_matches!(parse_answer("24:05"), Err(AnswerError::MinutesPastMidnight));
    }

    #[test]
    fn rejects_hours_past_24() {
        // Two digit hours are capped at 29 by the grammar, 25..=29 by range.
        assert_matches!(parse_answer("25:00"), Err(AnswerError::HourOutOfRange(25)));
    }

    #[test]
    fn rejects_missing_minutes() {
        assert_matches!(parse_answer("9"), Err(AnswerError::NoMatch));
        assert_matches!(parse_answer(""), Err(AnswerError::NoMatch));
    }

    #[test]
    fn rejects_bad_minutes() {
        assert_matches!(parse_answer("3:65"), Err(AnswerError::NoMatch));
        assert_matches!(parse_answer("3:5"), Err(AnswerError::NoMatch));
    }

    #[test]
    fn rejects_three_digit_hours_and_double_separators() {
        assert_matches!(parse_answer("123:15"), Err(AnswerError::NoMatch));
        assert_matches!(parse_answer("3::15"), Err(AnswerError::NoMatch));
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        // The grammar is anchored at both ends; padding is not a separator.
        assert_matches!(parse_answer(" 3:15"), Err(AnswerError::NoMatch));
        assert_matches!(parse_answer("3:15 "), Err(AnswerError::NoMatch));
    }

    #[test]
    fn rejects_two_digit_hour_not_starting_0_1_2() {
        // "95" could only be a two digit hour 9x, which the grammar forbids.
        assert_matches!(parse_answer("95:30"), Err(AnswerError::NoMatch));
    }

    #[test]
    fn wrong_answer_is_parsed_but_incorrect() {
        let a = parse_answer("4:30").unwrap();
        assert!(!a.matches(TimeOfDay::new(4, 45)));
    }

    #[test]
    fn tally_counts_and_summarizes() {
        let mut tally = ScoreTally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(tally.correct, 2);
        assert_eq!(tally.wrong, 1);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.summary(), "You got 2 of 3 correct!");
    }

    #[test]
    fn empty_tally_summary() {
        assert_eq!(ScoreTally::default().summary(), "You got 0 of 0 correct!");
    }

    #[test]
    fn dialog_accepts_correct_answer() {
        let mut dialog = QuestionDialog::new(1, TimeOfDay::new(3, 15));
        for c in "3:15".chars() {
            dialog.type_char(c);
        }
        let round = dialog.submit().expect("valid answer should close input");
        assert!(round.correct);
        assert_eq!(round.expected, TimeOfDay::new(3, 15));
    }

    #[test]
    fn dialog_judges_wrong_answer() {
        let mut dialog = QuestionDialog::new(1, TimeOfDay::new(3, 15));
        for c in "6:30".chars() {
            dialog.type_char(c);
        }
        let round = dialog.submit().unwrap();
        assert!(!round.correct);
    }

    #[test]
    fn dialog_stays_open_on_bad_input() {
        let mut dialog = QuestionDialog::new(1, TimeOfDay::new(3, 15));
        dialog.type_char('9');
        assert!(dialog.submit().is_none());
        assert_matches!(dialog.warning, Some(AnswerError::NoMatch));
        // Bad input is left selected; the next keystroke replaces it.
        assert!(dialog.is_selected());
        dialog.type_char('3');
        assert_eq!(dialog.input, "3");
        assert!(dialog.warning.is_none());
    }

    #[test]
    fn dialog_backspace_edits_input() {
        let mut dialog = QuestionDialog::new(2, TimeOfDay::new(1, 0));
        dialog.type_char('1');
        dialog.type_char('2');
        dialog.backspace();
        assert_eq!(dialog.input, "1");
    }

    #[test]
    fn dialog_backspace_clears_selection() {
        let mut dialog = QuestionDialog::new(2, TimeOfDay::new(1, 0));
        dialog.type_char('x');
        assert!(dialog.submit().is_none());
        dialog.backspace();
        assert_eq!(dialog.input, "");
    }

    #[test]
    fn dialog_title_numbers_rounds() {
        let dialog = QuestionDialog::new(7, TimeOfDay::new(0, 0));
        assert_eq!(dialog.title(), "Question #7");
    }
}
