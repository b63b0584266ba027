use std::time::Duration;

/// Award for a correct guess at the instant the round starts.
pub const GUESS_AWARD_MAX: i32 = 100;
/// Award for a correct guess at the buzzer.
pub const GUESS_AWARD_MIN: i32 = 20;
/// Fixed bonus to the drawer for each player who guesses their word.
pub const DRAWER_BONUS: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Matched the secret word; the award is already scaled for time.
    Correct { award: i32 },
    /// Ordinary chat, broadcast verbatim.
    Incorrect,
}

pub struct GuessEvaluator;

impl GuessEvaluator {
    /// Canonical form used for comparison: surrounding whitespace trimmed,
    /// case folded.
    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    pub fn matches(guess: &str, secret: &str) -> bool {
        Self::normalize(guess) == Self::normalize(secret)
    }

    /// Judge a guess against the secret word.
    pub fn evaluate(
        guess: &str,
        secret: &str,
        remaining: Duration,
        round_duration: Duration,
    ) -> GuessOutcome {
        if Self::matches(guess, secret) {
            GuessOutcome::Correct {
                award: Self::award(remaining, round_duration),
            }
        } else {
            GuessOutcome::Incorrect
        }
    }

    /// Linear interpolation between the maximum and minimum award across the
    /// round duration: a guess at the opening second earns
    /// `GUESS_AWARD_MAX`, one at the buzzer earns `GUESS_AWARD_MIN`.
    pub fn award(remaining: Duration, round_duration: Duration) -> i32 {
        if round_duration.is_zero() {
            return GUESS_AWARD_MIN;
        }
        let fraction =
            (remaining.as_secs_f64() / round_duration.as_secs_f64()).clamp(0.0, 1.0);
        GUESS_AWARD_MIN + ((GUESS_AWARD_MAX - GUESS_AWARD_MIN) as f64 * fraction).round() as i32
    }

    /// Length-preserving placeholder shown to everyone but the originator of
    /// a correct guess. Whitespace stays visible so word count is preserved.
    pub fn mask(text: &str) -> String {
        text.chars()
            .map(|c| if c.is_whitespace() { c } else { '*' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_comparison() {
        assert!(GuessEvaluator::matches("  Rocket ", "rocket"));
        assert!(GuessEvaluator::matches("ROCKET", "rocket"));
        assert!(!GuessEvaluator::matches("rockets", "rocket"));
        assert!(!GuessEvaluator::matches("", "rocket"));
    }

    #[test]
    fn test_award_interpolates_between_bounds() {
        let duration = Duration::from_secs(60);
        assert_eq!(GuessEvaluator::award(duration, duration), GUESS_AWARD_MAX);
        assert_eq!(GuessEvaluator::award(Duration::ZERO, duration), GUESS_AWARD_MIN);
        let mid = GuessEvaluator::award(Duration::from_secs(30), duration);
        assert_eq!(mid, (GUESS_AWARD_MAX + GUESS_AWARD_MIN) / 2);
    }

    #[test]
    fn test_earlier_guesses_score_more() {
        let duration = Duration::from_secs(60);
        let early = GuessEvaluator::award(Duration::from_secs(50), duration);
        let late = GuessEvaluator::award(Duration::from_secs(10), duration);
        assert!(early > late);
        assert!(early <= GUESS_AWARD_MAX);
        assert!(late >= GUESS_AWARD_MIN);
    }

    #[test]
    fn test_award_clamps_out_of_range_remaining() {
        let duration = Duration::from_secs(60);
        // A remaining value above the duration cannot exceed the maximum.
        assert_eq!(
            GuessEvaluator::award(Duration::from_secs(90), duration),
            GUESS_AWARD_MAX
        );
        assert_eq!(GuessEvaluator::award(Duration::ZERO, Duration::ZERO), GUESS_AWARD_MIN);
    }

    #[test]
    fn test_mask_preserves_length_and_spaces() {
        assert_eq!(GuessEvaluator::mask("rocket"), "******");
        assert_eq!(GuessEvaluator::mask("ice cream"), "*** *****");
        assert_eq!(GuessEvaluator::mask(""), "");
    }

    #[test]
    fn test_evaluate_correct_and_incorrect() {
        let duration = Duration::from_secs(60);
        match GuessEvaluator::evaluate("Rocket", "rocket", Duration::from_secs(60), duration) {
            GuessOutcome::Correct { award } => assert_eq!(award, GUESS_AWARD_MAX),
            other => panic!("expected correct, got {:?}", other),
        }
        assert_eq!(
            GuessEvaluator::evaluate("banana", "rocket", duration, duration),
            GuessOutcome::Incorrect
        );
    }
}
