use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Answer, MatchPair},
    reorder::{AnswerSink, Match},
};

/// The learner's current pairing for a matching question.
///
/// Left items are fixed. Right items come from one shared pool and each one
/// is assigned to at most one left item at a time.
pub struct MatchingEditor<S: AnswerSink> {
    lefts: Vec<String>,
    /// Display order of the pool.
    rights: Vec<String>,
    assignments: BTreeMap<String, String>,
    sink: S,
}

impl<S: AnswerSink> MatchingEditor<S> {
    /// Entries of `prior` that name unknown items, or reuse a right item
    /// already taken, are dropped.
    pub fn new<R: Rng + ?Sized>(
        pairs: &[MatchPair],
        prior: Option<BTreeMap<String, String>>,
        rng: &mut R,
        sink: S,
    ) -> Self {
        let lefts: Vec<String> = pairs.iter().map(|p| p.left.clone()).collect();
        let mut rights: Vec<String> = pairs.iter().map(|p| p.right.clone()).collect();
        rights.shuffle(rng);

        let mut editor = Self {
            lefts,
            rights,
            assignments: BTreeMap::new(),
            sink,
        };
        for (left, right) in prior.unwrap_or_default() {
            if editor.knows_left(&left)
                && editor.knows_right(&right)
                && editor.owner_of(&right).is_none()
            {
                editor.assignments.insert(left, right);
            }
        }
        editor
    }

    pub fn lefts(&self) -> &[String] {
        &self.lefts
    }

    pub fn assignment(&self, left: &str) -> Option<&str> {
        self.assignments.get(left).map(String::as_str)
    }

    pub fn assignments(&self) -> &BTreeMap<String, String> {
        &self.assignments
    }

    /// Right items not assigned to any left item, in display order.
    pub fn available(&self) -> Vec<&str> {
        self.rights
            .iter()
            .filter(|r| self.owner_of(r).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.lefts.iter().all(|l| self.assignments.contains_key(l))
    }

    pub fn answer(&self) -> Answer {
        Answer::Pairs(self.assignments.clone())
    }

    pub fn assign(&mut self, left: &str, right: &str) -> AppResult<()> {
        if !self.knows_left(left) {
            return Err(AppError::ValidationError(format!("Unknown item '{left}'")));
        }
        if !self.knows_right(right) {
            return Err(AppError::ValidationError(format!("Unknown match '{right}'")));
        }
        if self.assignment(left) == Some(right) {
            return Ok(());
        }

        if let Some(previous_owner) = self.owner_of(right).map(str::to_string) {
            self.assignments.remove(&previous_owner);
        }
        self.assignments.insert(left.to_string(), right.to_string());
        self.emit();
        Ok(())
    }

    pub fn unassign(&mut self, left: &str) -> Option<String> {
        let freed = self.assignments.remove(left);
        if freed.is_some() {
            self.emit();
        }
        freed
    }

    fn owner_of(&self, right: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, r)| r.as_str() == right)
            .map(|(l, _)| l.as_str())
    }

    fn knows_left(&self, left: &str) -> bool {
        self.lefts.iter().any(|l| l == left)
    }

    fn knows_right(&self, right: &str) -> bool {
        self.rights.iter().any(|r| r == right)
    }

    fn emit(&mut self) {
        let answer = self.answer();
        self.sink.answer_changed(&answer);
    }
}

impl<S: AnswerSink> Match for MatchingEditor<S> {
    fn on_assign(&mut self, left: &str, right: &str) -> AppResult<()> {
        self.assign(left, right)
    }

    fn on_unassign(&mut self, left: &str) -> Option<String> {
        self.unassign(left)
    }
}
