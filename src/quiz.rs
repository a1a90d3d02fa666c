use crate::catalog::{Catalog, FlagAsset, RegionId};
use crate::error::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MIN_CHOICES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Uninitialized,
    Configured,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

pub struct QuizSession {
    catalog: Arc<Catalog>,
    rng: StdRng,
    state: QuizState,
    choice_count: usize,
    enabled_regions: BTreeSet<RegionId>,
    questions_per_quiz: Option<usize>,
    eligible_pool: Vec<FlagAsset>,
    current_index: usize,
    guess_options: Vec<String>,
    eliminated: BTreeSet<String>,
    correct_count: usize,
    total_answered: usize,
}

impl QuizSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    pub fn with_rng(catalog: Arc<Catalog>, rng: StdRng) -> Self {
        QuizSession {
            catalog,
            rng,
            state: QuizState::Uninitialized,
            choice_count: MIN_CHOICES,
            enabled_regions: BTreeSet::new(),
            questions_per_quiz: None,
            eligible_pool: Vec::new(),
            current_index: 0,
            guess_options: Vec::new(),
            eliminated: BTreeSet::new(),
            correct_count: 0,
            total_answered: 0,
        }
    }

    /// Caps how many flags one quiz asks; `None` asks every eligible flag.
    pub fn set_questions_per_quiz(&mut self, limit: Option<usize>) {
        self.questions_per_quiz = limit.filter(|n| *n > 0);
    }

    /// Largest choice count the catalog can fill without repeating a label.
    pub fn max_choices(&self) -> usize {
        self.catalog.distinct_labels().max(MIN_CHOICES)
    }

    /// Applies new settings and rebuilds the eligible pool.
    ///
    /// `choice_count` is clamped to `MIN_CHOICES..=max_choices()`; the
    /// clamped value is returned.
    pub fn configure(&mut self, choice_count: usize, enabled_regions: &BTreeSet<RegionId>) -> usize {
        let clamped = choice_count.clamp(MIN_CHOICES, self.max_choices());
        if clamped != choice_count {
            warn!(
                requested = choice_count,
                applied = clamped,
                "Choice count out of range, clamping"
            );
        }

        self.choice_count = clamped;
        self.enabled_regions = enabled_regions.clone();
        self.eligible_pool = self.catalog.in_regions(enabled_regions);
        self.current_index = 0;
        self.guess_options.clear();
        self.eliminated.clear();
        self.state = QuizState::Configured;

        debug!(
            choices = clamped,
            regions = ?enabled_regions,
            pool = self.eligible_pool.len(),
            "Quiz configured"
        );
        clamped
    }

    /// Starts a fresh quiz: scores cleared, pool reshuffled, first question
    /// built.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == QuizState::Uninitialized {
            return Err(Error::NotConfigured);
        }

        self.eligible_pool = self.catalog.in_regions(&self.enabled_regions);
        self.eligible_pool.shuffle(&mut self.rng);
        if let Some(limit) = self.questions_per_quiz {
            self.eligible_pool.truncate(limit);
        }

        self.correct_count = 0;
        self.total_answered = 0;
        self.current_index = 0;
        self.eliminated.clear();

        if self.eligible_pool.is_empty() {
            warn!(regions = ?self.enabled_regions, "No flags in the enabled regions");
            self.guess_options.clear();
            self.state = QuizState::Complete;
            return Ok(());
        }

        self.state = QuizState::InProgress;
        self.build_guess_options();
        info!(flags = self.eligible_pool.len(), "Quiz started");
        Ok(())
    }

    /// Checks `label` against the current flag and advances on a match.
    pub fn record_guess(&mut self, label: &str) -> Result<GuessOutcome> {
        if self.state != QuizState::InProgress {
            return Err(Error::NotInProgress);
        }

        self.total_answered += 1;
        let correct = self.eligible_pool[self.current_index].label == label;

        if !correct {
            debug!(guess = label, "Incorrect guess");
            self.eliminated.insert(label.to_string());
            return Ok(GuessOutcome::Incorrect);
        }

        self.correct_count += 1;
        if self.current_index + 1 >= self.eligible_pool.len() {
            self.state = QuizState::Complete;
            info!(
                correct = self.correct_count,
                guesses = self.total_answered,
                "Quiz complete"
            );
        } else {
            self.current_index += 1;
            self.eliminated.clear();
            self.build_guess_options();
        }
        Ok(GuessOutcome::Correct)
    }

    /// One correct label plus distinct distractors, shuffled.
    ///
    /// Distractors come from the eligible pool first and from the rest of
    /// the catalog when the pool has too few labels.
    fn build_guess_options(&mut self) {
        let correct = self.eligible_pool[self.current_index].label.clone();
        let wanted = self.choice_count - 1;

        let mut pool_labels: Vec<String> = self
            .eligible_pool
            .iter()
            .map(|flag| flag.label.clone())
            .filter(|label| *label != correct)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        pool_labels.shuffle(&mut self.rng);

        let mut options: Vec<String> = pool_labels.into_iter().take(wanted).collect();

        if options.len() < wanted {
            let mut extra: Vec<String> = self
                .catalog
                .flags()
                .iter()
                .map(|flag| flag.label.clone())
                .filter(|label| *label != correct && !options.contains(label))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            extra.shuffle(&mut self.rng);
            let missing = wanted - options.len();
            options.extend(extra.into_iter().take(missing));
        }

        options.push(correct);
        options.shuffle(&mut self.rng);
        self.guess_options = options;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    pub fn enabled_regions(&self) -> &BTreeSet<RegionId> {
        &self.enabled_regions
    }

    pub fn current_flag(&self) -> Option<&FlagAsset> {
        match self.state {
            QuizState::InProgress => self.eligible_pool.get(self.current_index),
            _ => None,
        }
    }

    pub fn current_correct_answer(&self) -> Option<&str> {
        self.current_flag().map(|flag| flag.label.as_str())
    }

    pub fn guess_options(&self) -> &[String] {
        &self.guess_options
    }

    /// Whether `label` was already guessed wrong for the current flag.
    pub fn is_eliminated(&self, label: &str) -> bool {
        self.eliminated.contains(label)
    }

    /// 1-based number of the current question.
    pub fn question_number(&self) -> usize {
        self.current_index + 1
    }

    pub fn pool_len(&self) -> usize {
        self.eligible_pool.len()
    }

    pub fn pool(&self) -> &[FlagAsset] {
        &self.eligible_pool
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn total_answered(&self) -> usize {
        self.total_answered
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.correct_count,
            total: self.total_answered,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::FlagAsset;

    pub(crate) fn asia_catalog() -> Arc<Catalog> {
        let flags = [
            ("BD", "Bangladesh"),
            ("CN", "China"),
            ("IN", "India"),
            ("ID", "Indonesia"),
            ("JP", "Japan"),
            ("MY", "Malaysia"),
            ("NP", "Nepal"),
            ("PH", "Philippines"),
            ("KR", "South Korea"),
            ("TH", "Thailand"),
        ]
        .iter()
        .map(|(code, label)| FlagAsset::new(RegionId::Asia, code, label).unwrap())
        .chain(
            [("FR", "France"), ("DE", "Germany"), ("IT", "Italy")]
                .iter()
                .map(|(code, label)| FlagAsset::new(RegionId::Europe, code, label).unwrap()),
        )
        .chain(std::iter::once(
            FlagAsset::new(RegionId::NorthAmerica, "CA", "Canada").unwrap(),
        ))
        .collect();
        Arc::new(Catalog::from_flags(flags).unwrap())
    }

    pub(crate) fn seeded(catalog: Arc<Catalog>, seed: u64) -> QuizSession {
        QuizSession::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn regions(list: &[RegionId]) -> BTreeSet<RegionId> {
        list.iter().copied().collect()
    }

    fn wrong_option(session: &QuizSession) -> String {
        let correct = session.current_correct_answer().unwrap().to_string();
        session
            .guess_options()
            .iter()
            .find(|option| **option != correct)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_new_session_is_uninitialized() {
        let mut session = seeded(asia_catalog(), 1);
        assert_eq!(session.state(), QuizState::Uninitialized);
        assert!(matches!(session.reset(), Err(Error::NotConfigured)));
        assert!(matches!(
            session.record_guess("Japan"),
            Err(Error::NotInProgress)
        ));
    }

    #[test]
    fn test_configure_clamps_choice_count() {
        let mut session = seeded(asia_catalog(), 1);
        let asia = regions(&[RegionId::Asia]);

        assert_eq!(session.configure(1, &asia), 2);
        assert_eq!(session.configure(0, &asia), 2);
        assert_eq!(session.configure(99, &asia), 14);
        assert_eq!(session.configure(6, &asia), 6);
        assert_eq!(session.state(), QuizState::Configured);
    }

    #[test]
    fn test_reset_builds_valid_options_for_every_choice_count() {
        for choices in MIN_CHOICES..=14 {
            for seed in 0..5 {
                let mut session = seeded(asia_catalog(), seed);
                session.configure(choices, &regions(&[RegionId::Asia]));
                session.reset().unwrap();

                let options = session.guess_options();
                let correct = session.current_correct_answer().unwrap();
                let unique: BTreeSet<_> = options.iter().collect();

                assert_eq!(options.len(), choices);
                assert_eq!(unique.len(), choices);
                assert_eq!(options.iter().filter(|o| o.as_str() == correct).count(), 1);
            }
        }
    }

    #[test]
    fn test_distractors_top_up_from_catalog_when_pool_is_small() {
        let mut session = seeded(asia_catalog(), 3);
        session.configure(4, &regions(&[RegionId::NorthAmerica]));
        session.reset().unwrap();

        assert_eq!(session.pool_len(), 1);
        assert_eq!(session.current_correct_answer(), Some("Canada"));
        assert_eq!(session.guess_options().len(), 4);
    }

    #[test]
    fn test_correct_answer_position_varies() {
        let mut positions = BTreeSet::new();
        for seed in 0..40 {
            let mut session = seeded(asia_catalog(), seed);
            session.configure(4, &regions(&[RegionId::Asia]));
            session.reset().unwrap();
            let correct = session.current_correct_answer().unwrap();
            let position = session
                .guess_options()
                .iter()
                .position(|o| o == correct)
                .unwrap();
            positions.insert(position);
        }
        assert!(positions.len() > 1);
    }

    #[test]
    fn test_incorrect_guess_keeps_current_flag() {
        let mut session = seeded(asia_catalog(), 7);
        session.configure(4, &regions(&[RegionId::Asia]));
        session.reset().unwrap();

        let before = session.current_flag().unwrap().clone();
        let options_before = session.guess_options().to_vec();
        let wrong = wrong_option(&session);

        assert_eq!(session.record_guess(&wrong).unwrap(), GuessOutcome::Incorrect);
        assert_eq!(session.current_flag(), Some(&before));
        assert_eq!(session.guess_options(), options_before.as_slice());
        assert_eq!(session.question_number(), 1);
        assert_eq!(session.total_answered(), 1);
        assert_eq!(session.correct_count(), 0);
        assert!(session.is_eliminated(&wrong));
        assert_eq!(session.state(), QuizState::InProgress);
    }

    #[test]
    fn test_correct_guess_advances_to_distinct_flag() {
        let mut session = seeded(asia_catalog(), 11);
        session.configure(4, &regions(&[RegionId::Asia]));
        session.reset().unwrap();

        let wrong = wrong_option(&session);
        session.record_guess(&wrong).unwrap();

        let first = session.current_flag().unwrap().clone();
        let outcome = session.record_guess(&first.label).unwrap();

        assert_eq!(outcome, GuessOutcome::Correct);
        assert_eq!(session.question_number(), 2);
        assert_ne!(session.current_flag().unwrap().id, first.id);
        assert!(!session.is_eliminated(&wrong));
    }

    #[test]
    fn test_correct_guess_on_last_flag_completes() {
        let mut session = seeded(asia_catalog(), 5);
        session.configure(2, &regions(&[RegionId::NorthAmerica]));
        session.reset().unwrap();

        assert_eq!(session.record_guess("Canada").unwrap(), GuessOutcome::Correct);
        assert_eq!(session.state(), QuizState::Complete);
        assert!(session.current_flag().is_none());
        assert!(matches!(
            session.record_guess("Canada"),
            Err(Error::NotInProgress)
        ));
    }

    #[test]
    fn test_asia_scenario_runs_to_completion() {
        let mut session = seeded(asia_catalog(), 42);
        session.configure(4, &regions(&[RegionId::Asia]));
        session.reset().unwrap();

        assert_eq!(session.pool_len(), 10);
        assert!(session.pool().iter().all(|f| f.region == RegionId::Asia));
        assert_eq!(session.guess_options().len(), 4);
        let first = session.current_correct_answer().unwrap().to_string();
        assert!(session.guess_options().contains(&first));

        let mut seen = BTreeSet::new();
        for _ in 0..10 {
            assert_eq!(session.state(), QuizState::InProgress);
            let answer = session.current_correct_answer().unwrap().to_string();
            assert!(seen.insert(answer.clone()));
            session.record_guess(&answer).unwrap();
        }

        assert_eq!(session.state(), QuizState::Complete);
        assert_eq!(session.correct_count(), 10);
        assert_eq!(session.total_answered(), 10);
        assert_eq!(session.score().percent(), 100.0);
    }

    #[test]
    fn test_reset_clears_score_from_any_state() {
        let mut session = seeded(asia_catalog(), 9);
        session.configure(3, &regions(&[RegionId::Europe]));
        session.reset().unwrap();

        while session.state() == QuizState::InProgress {
            let wrong = wrong_option(&session);
            session.record_guess(&wrong).unwrap();
            let answer = session.current_correct_answer().unwrap().to_string();
            session.record_guess(&answer).unwrap();
        }
        assert_eq!(session.score(), Score { correct: 3, total: 6 });
        assert_eq!(session.score().percent(), 50.0);

        session.reset().unwrap();
        assert_eq!(session.state(), QuizState::InProgress);
        assert_eq!(session.score(), Score { correct: 0, total: 0 });
        assert_eq!(session.question_number(), 1);
    }

    #[test]
    fn test_questions_per_quiz_caps_pool() {
        let mut session = seeded(asia_catalog(), 2);
        session.set_questions_per_quiz(Some(3));
        session.configure(4, &regions(&[RegionId::Asia]));
        session.reset().unwrap();
        assert_eq!(session.pool_len(), 3);

        session.set_questions_per_quiz(Some(0));
        session.reset().unwrap();
        assert_eq!(session.pool_len(), 10);
    }

    #[test]
    fn test_empty_pool_completes_immediately() {
        let mut session = seeded(asia_catalog(), 2);
        session.configure(4, &regions(&[RegionId::Oceania]));
        session.reset().unwrap();

        assert_eq!(session.state(), QuizState::Complete);
        assert!(session.guess_options().is_empty());
    }
}
