use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::{
    models::domain::Answer,
    reorder::{AnswerSink, Reorder},
};

const MAX_SHUFFLES: usize = 8;

/// A uniformly shuffled copy of `canonical` that is not already in the
/// correct order (unless every arrangement is, e.g. a single item).
pub fn shuffled_order<R: Rng + ?Sized>(canonical: &[String], rng: &mut R) -> Vec<String> {
    let mut items = canonical.to_vec();
    if items.len() < 2 {
        return items;
    }
    for _ in 0..MAX_SHUFFLES {
        items.shuffle(rng);
        if items != canonical {
            return items;
        }
    }
    items.rotate_left(1);
    items
}

fn is_permutation_of(candidate: &[String], canonical: &[String]) -> bool {
    if candidate.len() != canonical.len() {
        return false;
    }
    let expected: HashSet<&String> = canonical.iter().collect();
    let seen: HashSet<&String> = candidate.iter().collect();
    seen.len() == candidate.len() && seen == expected
}

/// The learner's current arrangement for an ordering question.
pub struct OrderingEditor<S: AnswerSink> {
    items: Vec<String>,
    sink: S,
}

impl<S: AnswerSink> OrderingEditor<S> {
    /// Resumes `prior` when it is an arrangement of the same items;
    /// otherwise starts from a shuffle and reports it to the form.
    pub fn new<R: Rng + ?Sized>(
        canonical: &[String],
        prior: Option<Vec<String>>,
        rng: &mut R,
        sink: S,
    ) -> Self {
        match prior {
            Some(items) if is_permutation_of(&items, canonical) => Self { items, sink },
            _ => {
                let mut editor = Self {
                    items: shuffled_order(canonical, rng),
                    sink,
                };
                editor.emit();
                editor
            }
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn answer(&self) -> Answer {
        Answer::Order(self.items.clone())
    }

    pub fn move_item(&mut self, source: usize, destination: usize) -> bool {
        let len = self.items.len();
        if source >= len || destination >= len || source == destination {
            return false;
        }
        let item = self.items.remove(source);
        self.items.insert(destination, item);
        self.emit();
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        match index.checked_sub(1) {
            Some(destination) => self.move_item(index, destination),
            None => false,
        }
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        match index.checked_add(1) {
            Some(destination) => self.move_item(index, destination),
            None => false,
        }
    }

    fn emit(&mut self) {
        let answer = self.answer();
        self.sink.answer_changed(&answer);
    }
}

impl<S: AnswerSink> Reorder for OrderingEditor<S> {
    fn on_reorder(&mut self, source: usize, destination: usize) -> bool {
        self.move_item(source, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::Detached;
    use rand::{rngs::StdRng, SeedableRng};
    use std::{cell::RefCell, rc::Rc};

    fn canonical() -> Vec<String> {
        ["Check mirrors", "Signal", "Shoulder check", "Change lanes"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn editor(prior: Option<Vec<String>>) -> OrderingEditor<Detached> {
        let mut rng = StdRng::seed_from_u64(11);
        OrderingEditor::new(&canonical(), prior, &mut rng, Detached)
    }

    #[test]
    fn fresh_editor_is_a_shuffled_permutation() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let order = shuffled_order(&canonical(), &mut rng);
            assert_ne!(order, canonical(), "seed {seed}");
            assert!(is_permutation_of(&order, &canonical()));
        }
    }

    #[test]
    fn same_seed_gives_same_initial_order() {
        let a = editor(None);
        let b = editor(None);
        assert_eq!(a.items(), b.items());
    }

    #[test]
    fn prior_answer_is_resumed_without_shuffling() {
        let prior = vec![
            "Signal".to_string(),
            "Check mirrors".to_string(),
            "Change lanes".to_string(),
            "Shoulder check".to_string(),
        ];
        let e = editor(Some(prior.clone()));
        assert_eq!(e.items(), prior.as_slice());
    }

    #[test]
    fn foreign_prior_answer_is_ignored() {
        let e = editor(Some(vec!["Something else".to_string()]));
        assert!(is_permutation_of(e.items(), &canonical()));
    }

    #[test]
    fn drag_moves_item_to_destination() {
        let mut e = editor(Some(canonical()));
        assert!(e.on_reorder(0, 2));
        assert_eq!(
            e.items(),
            ["Signal", "Shoulder check", "Check mirrors", "Change lanes"]
        );
    }

    #[test]
    fn edge_moves_are_no_ops() {
        let mut e = editor(Some(canonical()));
        assert!(!e.move_up(0));
        assert!(!e.move_down(3));
        assert!(!e.move_item(1, 9));
        assert!(!e.move_item(2, 2));
        assert!(!e.move_down(usize::MAX));
        assert!(!e.move_up(usize::MAX));
        assert_eq!(e.items(), canonical().as_slice());
    }

    #[test]
    fn up_then_down_restores_order() {
        for index in 0..4 {
            let mut e = editor(None);
            let before = e.items().to_vec();
            if e.move_up(index) {
                assert!(e.move_down(index - 1));
            }
            assert_eq!(e.items(), before.as_slice());

            if e.move_down(index) {
                assert!(e.move_up(index + 1));
            }
            assert_eq!(e.items(), before.as_slice());
        }
    }

    #[test]
    fn every_change_is_pushed_to_the_form() {
        let emitted: Rc<RefCell<Vec<Answer>>> = Rc::default();
        let sink = {
            let emitted = Rc::clone(&emitted);
            move |answer: &Answer| emitted.borrow_mut().push(answer.clone())
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut e = OrderingEditor::new(&canonical(), None, &mut rng, sink);
        assert_eq!(emitted.borrow().len(), 1);

        e.move_down(0);
        e.move_up(0);
        assert_eq!(emitted.borrow().len(), 3);
        assert_eq!(emitted.borrow().last(), Some(&e.answer()));
    }
}
