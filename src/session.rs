use crate::time_series::TimeSeriesPoint;
use serde::Serialize;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Pending,
    Correct,
    Incorrect,
}

/// Scoring overlay for a single character of a target word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharState {
    pub char: char,
    pub status: CharStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// An immutable target word plus its mutable scoring overlay.
#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    pub chars: Vec<CharState>,
    pub status: WordStatus,
}

impl Word {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            chars: text
                .chars()
                .map(|c| CharState {
                    char: c,
                    status: CharStatus::Pending,
                })
                .collect(),
            status: WordStatus::Pending,
        }
    }

    fn reset(&mut self) {
        for cs in &mut self.chars {
            cs.status = CharStatus::Pending;
        }
        self.status = WordStatus::Pending;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    Running,
    Finished,
}

/// Input events consumed by the scoring engine. `Input` carries the full
/// current value of the input buffer, not a single keystroke.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Input(String),
    Tick,
    Restart,
}

/// Final snapshot of a completed test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TestSummary {
    pub wpm: f64,
    pub accuracy: f64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    pub elapsed_secs: f64,
}

impl TestSummary {
    fn from_counts(correct: usize, incorrect: usize, elapsed_secs: f64) -> Self {
        let total = correct + incorrect;
        let elapsed_mins = elapsed_secs / 60.0;

        let wpm = if elapsed_mins > 0.0 {
            ((correct as f64 / 5.0) / elapsed_mins).round()
        } else {
            0.0
        };
        let accuracy = if total > 0 {
            (correct as f64 / total as f64 * 100.0).round()
        } else {
            100.0
        };

        Self {
            wpm,
            accuracy,
            correct_chars: correct,
            incorrect_chars: incorrect,
            total_chars: total,
            elapsed_secs,
        }
    }
}

/// One typing-test session: the target words, the scoring counters, and the
/// countdown. All mutation happens synchronously through [`Session::handle`]
/// or the individual operations below; there is exactly one writer.
#[derive(Debug)]
pub struct Session {
    pub words: Vec<Word>,
    pub current_word: usize,
    pub input: String,
    pub started_at: Option<SystemTime>,
    pub duration_secs: u64,
    pub seconds_remaining: u64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub status: Status,
    pub summary: Option<TestSummary>,
    pub wpm_series: Vec<TimeSeriesPoint>,
}

impl Session {
    pub fn new(words: Vec<String>, duration_secs: u64) -> Self {
        let mut words: Vec<Word> = words.iter().map(|w| Word::new(w)).collect();
        if let Some(first) = words.first_mut() {
            first.status = WordStatus::Current;
        }

        Self {
            words,
            current_word: 0,
            input: String::new(),
            started_at: None,
            duration_secs,
            seconds_remaining: duration_secs,
            correct_chars: 0,
            incorrect_chars: 0,
            status: Status::NotStarted,
            summary: None,
            wpm_series: Vec::new(),
        }
    }

    pub fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Input(raw) => {
                if self.status == Status::Finished {
                    return;
                }
                self.start();
                self.apply_input(&raw);
            }
            Msg::Tick => self.tick(),
            Msg::Restart => self.reset(),
        }
    }

    /// NotStarted → Running. No-op on a session that is already running
    /// or finished.
    pub fn start(&mut self) {
        if self.status == Status::NotStarted {
            self.status = Status::Running;
            self.started_at = Some(SystemTime::now());
        }
    }

    /// Consume the current value of the input buffer. A trailing space
    /// finalizes the current word; anything else rescores it live.
    pub fn apply_input(&mut self, raw: &str) {
        if self.status != Status::Running || self.current_word >= self.words.len() {
            return;
        }

        if raw.ends_with(' ') {
            self.finalize_word(raw.trim());
        } else {
            self.rescore_current(raw);
            self.input = raw.to_string();
        }
    }

    /// Score the submitted word position-by-position against the target,
    /// penalizing mismatches, missing characters, and extra characters
    /// alike, then advance (or complete when this was the last word).
    fn finalize_word(&mut self, typed: &str) {
        let typed: Vec<char> = typed.chars().collect();
        let word = &mut self.words[self.current_word];
        let target: Vec<char> = word.text.chars().collect();

        let mut correct = 0;
        let mut incorrect = 0;
        for i in 0..typed.len().max(target.len()) {
            match (typed.get(i), target.get(i)) {
                (Some(t), Some(e)) if t == e => correct += 1,
                _ => incorrect += 1,
            }
        }

        word.status = if typed == target {
            WordStatus::Correct
        } else {
            WordStatus::Incorrect
        };

        self.correct_chars += correct;
        self.incorrect_chars += incorrect;
        self.input.clear();

        if self.current_word + 1 < self.words.len() {
            self.current_word += 1;
            self.words[self.current_word].status = WordStatus::Current;
        } else {
            self.complete();
        }
    }

    /// Full recomputation of the current word's character states. Positions
    /// beyond the typed length revert to Pending, which is what makes
    /// backspacing work.
    fn rescore_current(&mut self, raw: &str) {
        let typed: Vec<char> = raw.chars().collect();
        let word = &mut self.words[self.current_word];

        for (i, cs) in word.chars.iter_mut().enumerate() {
            cs.status = match typed.get(i) {
                Some(t) if *t == cs.char => CharStatus::Correct,
                Some(_) => CharStatus::Incorrect,
                None => CharStatus::Pending,
            };
        }
    }

    /// One-second timer tick. Samples the live WPM curve and completes the
    /// session when the countdown reaches zero.
    pub fn tick(&mut self) {
        if self.status != Status::Running {
            return;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        let elapsed = self.duration_secs - self.seconds_remaining;
        self.wpm_series
            .push(TimeSeriesPoint::new(elapsed as f64, self.live_wpm()));

        if self.seconds_remaining == 0 {
            self.complete();
        }
    }

    /// Transition to Finished and produce the final summary from whatever
    /// counters have accumulated. Idempotent: a second call returns the
    /// summary computed the first time. A word still being typed is never
    /// scored into the totals.
    pub fn complete(&mut self) -> TestSummary {
        if let Some(summary) = self.summary {
            return summary;
        }

        self.status = Status::Finished;
        let elapsed_secs = match self.started_at {
            Some(at) => at
                .elapsed()
                .map(|d| d.as_secs_f64())
                .unwrap_or(self.duration_secs as f64),
            None => self.duration_secs as f64,
        };

        let summary = TestSummary::from_counts(self.correct_chars, self.incorrect_chars, elapsed_secs);
        self.summary = Some(summary);
        summary
    }

    /// Back to NotStarted with the same target words and zeroed counters.
    pub fn reset(&mut self) {
        for word in &mut self.words {
            word.reset();
        }
        if let Some(first) = self.words.first_mut() {
            first.status = WordStatus::Current;
        }

        self.current_word = 0;
        self.input.clear();
        self.started_at = None;
        self.seconds_remaining = self.duration_secs;
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        self.status = Status::NotStarted;
        self.summary = None;
        self.wpm_series.clear();
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.status == Status::Finished
    }

    pub fn total_chars(&self) -> usize {
        self.correct_chars + self.incorrect_chars
    }

    /// (1-based current word, total words) for the progress display.
    pub fn progress(&self) -> (usize, usize) {
        ((self.current_word + 1).min(self.words.len()), self.words.len())
    }

    /// Cursor position within the current word, capped at its length.
    pub fn cursor_in_word(&self) -> usize {
        let len = self
            .words
            .get(self.current_word)
            .map(|w| w.chars.len())
            .unwrap_or(0);
        self.input.chars().count().min(len)
    }

    pub fn live_wpm(&self) -> f64 {
        let elapsed_mins = match self.started_at.and_then(|at| at.elapsed().ok()) {
            Some(d) => d.as_secs_f64() / 60.0,
            None => return 0.0,
        };
        if elapsed_mins > 0.0 {
            ((self.correct_chars as f64 / 5.0) / elapsed_mins).round()
        } else {
            0.0
        }
    }

    pub fn live_accuracy(&self) -> f64 {
        let total = self.total_chars();
        if total > 0 {
            (self.correct_chars as f64 / total as f64 * 100.0).round()
        } else {
            100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn session(words: &[&str], secs: u64) -> Session {
        Session::new(words.iter().map(|w| w.to_string()).collect(), secs)
    }

    fn statuses(word: &Word) -> Vec<CharStatus> {
        word.chars.iter().map(|c| c.status).collect()
    }

    #[test]
    fn test_new_session() {
        let s = session(&["hello", "world"], 60);

        assert_eq!(s.status, Status::NotStarted);
        assert_eq!(s.current_word, 0);
        assert_eq!(s.seconds_remaining, 60);
        assert_eq!(s.correct_chars, 0);
        assert_eq!(s.incorrect_chars, 0);
        assert_eq!(s.words[0].status, WordStatus::Current);
        assert_eq!(s.words[1].status, WordStatus::Pending);
        assert!(!s.has_started());
        assert!(!s.has_finished());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut s = session(&["hello"], 60);

        s.start();
        let first = s.started_at;
        assert_matches!(s.status, Status::Running);

        s.start();
        assert_eq!(s.started_at, first);
    }

    #[test]
    fn test_live_rescore_marks_correct_and_incorrect() {
        let mut s = session(&["hello"], 60);
        s.start();

        s.apply_input("he");
        assert_eq!(
            statuses(&s.words[0]),
            vec![
                CharStatus::Correct,
                CharStatus::Correct,
                CharStatus::Pending,
                CharStatus::Pending,
                CharStatus::Pending,
            ]
        );

        s.apply_input("hx");
        assert_eq!(s.words[0].chars[1].status, CharStatus::Incorrect);

        // Backspacing reverts the abandoned position to Pending.
        s.apply_input("h");
        assert_eq!(s.words[0].chars[1].status, CharStatus::Pending);
        assert_eq!(s.input, "h");
    }

    #[test]
    fn test_live_rescore_does_not_touch_counters() {
        let mut s = session(&["hello"], 60);
        s.start();

        s.apply_input("hxl");
        assert_eq!(s.correct_chars, 0);
        assert_eq!(s.incorrect_chars, 0);
    }

    #[test]
    fn test_exact_word_scores_full_length() {
        let mut s = session(&["hello", "world"], 60);
        s.start();

        s.apply_input("hello ");

        assert_eq!(s.correct_chars, 5);
        assert_eq!(s.incorrect_chars, 0);
        assert_eq!(s.words[0].status, WordStatus::Correct);
        assert_eq!(s.words[1].status, WordStatus::Current);
        assert_eq!(s.current_word, 1);
        assert!(s.input.is_empty());
    }

    #[test]
    fn test_undershoot_penalizes_missing_chars() {
        let mut s = session(&["cat", "dog"], 60);
        s.start();

        s.apply_input("ca ");

        // min(2,3) positions scored individually + 1 missing.
        assert_eq!(s.correct_chars, 2);
        assert_eq!(s.incorrect_chars, 1);
        assert_eq!(s.total_chars(), 3);
        assert_eq!(s.words[0].status, WordStatus::Incorrect);
    }

    #[test]
    fn test_overshoot_penalizes_every_extra_char() {
        let mut s = session(&["cat", "dog"], 60);
        s.start();

        s.apply_input("catss ");

        assert_eq!(s.correct_chars, 3);
        assert_eq!(s.incorrect_chars, 2);
        assert_eq!(s.total_chars(), 5);
        assert_eq!(s.words[0].status, WordStatus::Incorrect);
    }

    #[test]
    fn test_word_total_equals_max_length() {
        for (typed, target) in [("ab", "abcde"), ("abcde", "ab"), ("xyz", "abc")] {
            let mut s = session(&[target, "pad"], 60);
            s.start();
            s.apply_input(&format!("{typed} "));

            let expected = typed.chars().count().max(target.chars().count());
            assert_eq!(
                s.correct_chars + s.incorrect_chars,
                expected,
                "typed {typed:?} against {target:?}"
            );
        }
    }

    #[test]
    fn test_counter_invariant_holds_after_every_input() {
        let mut s = session(&["the", "quick", "fox"], 60);
        s.start();

        for raw in ["t", "th", "the", "the ", "qu", "qux", "qux ", "f", "fox "] {
            s.apply_input(raw);
            assert_eq!(s.correct_chars + s.incorrect_chars, s.total_chars());
        }
    }

    #[test]
    fn test_bare_space_scores_empty_attempt() {
        let mut s = session(&["cat", "dog"], 60);
        s.start();

        s.apply_input(" ");

        assert_eq!(s.correct_chars, 0);
        assert_eq!(s.incorrect_chars, 3);
        assert_eq!(s.words[0].status, WordStatus::Incorrect);
    }

    #[test]
    fn test_last_word_boundary_completes_session() {
        let mut s = session(&["hi"], 60);
        s.start();

        s.apply_input("hi ");

        assert!(s.has_finished());
        let summary = s.summary.expect("summary after completion");
        assert_eq!(summary.correct_chars, 2);
        assert_eq!(summary.incorrect_chars, 0);
        assert_eq!(summary.total_chars, 2);
    }

    #[test]
    fn test_tick_counts_down_and_expires() {
        let mut s = session(&["hello"], 3);
        s.start();

        s.tick();
        s.tick();
        assert_eq!(s.seconds_remaining, 1);
        assert!(!s.has_finished());

        s.tick();
        assert_eq!(s.seconds_remaining, 0);
        assert!(s.has_finished());
        assert_eq!(s.wpm_series.len(), 3);
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut s = session(&["hello"], 10);

        s.tick();
        assert_eq!(s.seconds_remaining, 10);

        s.start();
        s.complete();
        s.tick();
        assert_eq!(s.seconds_remaining, 10);
    }

    #[test]
    fn test_expiry_mid_word_discards_partial_input() {
        let mut s = session(&["hello", "world"], 2);
        s.start();

        s.apply_input("hello ");
        s.apply_input("wor");

        s.tick();
        s.tick();

        assert!(s.has_finished());
        let summary = s.summary.expect("summary after expiry");
        assert_eq!(summary.correct_chars, 5);
        assert_eq!(summary.incorrect_chars, 0);
        assert_eq!(summary.total_chars, 5);
    }

    #[test]
    fn test_wpm_calculation() {
        let mut s = session(&["hello"], 60);
        s.started_at = Some(SystemTime::now() - Duration::from_secs(60));
        s.status = Status::Running;
        s.correct_chars = 50;

        let summary = s.complete();

        assert_eq!(summary.wpm, 10.0);
        assert_eq!(summary.accuracy, 100.0);
        assert!((summary.elapsed_secs - 60.0).abs() < 1.0);
    }

    #[test]
    fn test_accuracy_rounding() {
        let mut s = session(&["hello"], 60);
        s.started_at = Some(SystemTime::now() - Duration::from_secs(30));
        s.status = Status::Running;
        s.correct_chars = 2;
        s.incorrect_chars = 1;

        let summary = s.complete();
        assert_eq!(summary.accuracy, 67.0);
    }

    #[test]
    fn test_complete_never_started_uses_configured_duration() {
        let mut s = session(&["hello"], 60);

        let summary = s.complete();

        assert_eq!(summary.wpm, 0.0);
        assert_eq!(summary.accuracy, 100.0);
        assert_eq!(summary.total_chars, 0);
        assert_eq!(summary.elapsed_secs, 60.0);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut s = session(&["hi"], 60);
        s.start();
        s.apply_input("hi ");

        let first = s.summary.expect("summary");
        let second = s.complete();

        assert_eq!(first, second);
        assert_matches!(s.status, Status::Finished);
    }

    #[test]
    fn test_apply_input_noop_when_not_running() {
        let mut s = session(&["hello"], 60);

        s.apply_input("hel");
        assert_eq!(statuses(&s.words[0]), vec![CharStatus::Pending; 5]);

        s.start();
        s.complete();
        s.apply_input("hello ");
        assert_eq!(s.correct_chars, 0);
    }

    #[test]
    fn test_apply_input_noop_on_empty_word_list() {
        let mut s = session(&[], 60);
        s.start();

        // Must not panic or corrupt counters.
        s.apply_input("anything ");
        assert_eq!(s.total_chars(), 0);
    }

    #[test]
    fn test_msg_input_starts_session() {
        let mut s = session(&["hello"], 60);

        s.handle(Msg::Input("h".into()));

        assert!(s.has_started());
        assert_matches!(s.status, Status::Running);
        assert_eq!(s.words[0].chars[0].status, CharStatus::Correct);
    }

    #[test]
    fn test_msg_input_after_finish_is_noop() {
        let mut s = session(&["hi"], 60);
        s.handle(Msg::Input("hi ".into()));
        assert!(s.has_finished());

        s.handle(Msg::Input("more ".into()));
        assert_eq!(s.summary.map(|r| r.total_chars), Some(2));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session(&["cat", "dog"], 30);
        s.handle(Msg::Input("cax ".into()));
        s.handle(Msg::Tick);
        s.complete();

        s.handle(Msg::Restart);

        assert_eq!(s.status, Status::NotStarted);
        assert_eq!(s.current_word, 0);
        assert_eq!(s.correct_chars, 0);
        assert_eq!(s.incorrect_chars, 0);
        assert_eq!(s.seconds_remaining, 30);
        assert!(s.summary.is_none());
        assert!(s.wpm_series.is_empty());
        assert_eq!(s.words[0].status, WordStatus::Current);
        assert_eq!(s.words[1].status, WordStatus::Pending);
        assert_eq!(statuses(&s.words[0]), vec![CharStatus::Pending; 3]);
    }

    #[test]
    fn test_progress_and_cursor() {
        let mut s = session(&["cat", "dog"], 60);
        assert_eq!(s.progress(), (1, 2));

        s.start();
        s.apply_input("ca");
        assert_eq!(s.cursor_in_word(), 2);

        // Overshoot is capped at the word length for display purposes.
        s.apply_input("cattt");
        assert_eq!(s.cursor_in_word(), 3);

        s.apply_input("cat ");
        assert_eq!(s.progress(), (2, 2));
    }

    #[test]
    fn test_live_accuracy_defaults_to_100() {
        let s = session(&["hello"], 60);
        assert_eq!(s.live_accuracy(), 100.0);
        assert_eq!(s.live_wpm(), 0.0);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = TestSummary::from_counts(10, 2, 30.0);
        let json = serde_json::to_value(summary).expect("summary serializes");

        assert_eq!(json["correct_chars"], 10);
        assert_eq!(json["total_chars"], 12);
        assert_eq!(json["accuracy"], 83.0);
    }
}
