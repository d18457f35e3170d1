//! Wizard controller
//!
//! Owns the current step index and the accumulator of submitted step
//! snapshots. Never validates fields itself: `advance` is only called
//! with the snapshot of a fully valid step form.

use super::step::{StepForm, StepSchema};
use super::value::FormValues;
use std::collections::BTreeMap;
use thiserror::Error;

/// Final-submission aggregation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// Two steps declared the same top-level field. The shipped step
    /// schemas keep their keys disjoint, so this guards future edits
    /// rather than a reachable state.
    #[error("field `{0}` is defined by more than one step")]
    KeyCollision(String),
}

/// Result of a successful advance
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the next step
    Next,
    /// The last step submitted; here is the merged aggregate
    Complete(FormValues),
}

pub struct Wizard {
    schemas: Vec<StepSchema>,
    /// 1-based, always within [1, total]
    current: usize,
    accumulator: BTreeMap<usize, FormValues>,
}

impl Wizard {
    pub fn new(schemas: Vec<StepSchema>) -> Self {
        debug_assert!(!schemas.is_empty());
        Self {
            schemas,
            current: 1,
            accumulator: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.schemas.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn on_last_step(&self) -> bool {
        self.current == self.total()
    }

    pub fn schema(&self, number: usize) -> Option<&StepSchema> {
        self.schemas.get(number.checked_sub(1)?)
    }

    /// Last successfully submitted values of a step
    pub fn accumulated(&self, number: usize) -> Option<&FormValues> {
        self.accumulator.get(&number)
    }

    /// Has the step ever been submitted successfully
    pub fn is_completed(&self, number: usize) -> bool {
        self.accumulator.contains_key(&number)
    }

    /// Mount the current step's form, prepopulated from the
    /// accumulator when the step was submitted before
    pub fn step_form(&self) -> StepForm {
        let schema = self.schemas[self.current - 1].clone();
        match self.accumulator.get(&self.current) {
            Some(prior) => StepForm::with_values(schema, prior.clone()),
            None => StepForm::new(schema),
        }
    }

    /// Record a step's snapshot and move forward. On the last step this
    /// is the final submission and yields the aggregate.
    pub fn advance(&mut self, snapshot: FormValues) -> Result<Advance, AggregateError> {
        self.accumulator.insert(self.current, snapshot);
        if self.current < self.total() {
            self.current += 1;
            return Ok(Advance::Next);
        }
        Ok(Advance::Complete(self.aggregate()?))
    }

    /// Step back without touching the accumulator
    pub fn retreat(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Union of every accumulated step mapping
    pub fn aggregate(&self) -> Result<FormValues, AggregateError> {
        let mut merged = FormValues::new();
        for snapshot in self.accumulator.values() {
            merged
                .merge(snapshot.clone())
                .map_err(AggregateError::KeyCollision)?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::field::FieldSpec;
    use crate::state::path::FieldPath;
    use crate::state::value::Value;
    use pretty_assertions::assert_eq;

    fn two_step_wizard() -> Wizard {
        Wizard::new(vec![
            StepSchema::new(1, "Personal")
                .field(FieldSpec::number(FieldPath::key("age"), "Age")),
            StepSchema::new(2, "Contact")
                .field(FieldSpec::text(FieldPath::key("email"), "Email")),
        ])
    }

    fn snapshot(key: &str, value: Value) -> FormValues {
        let mut values = FormValues::new();
        values.set(&FieldPath::key(key), value);
        values
    }

    #[test]
    fn test_starts_at_step_one() {
        let wizard = two_step_wizard();
        assert_eq!(wizard.current(), 1);
        assert_eq!(wizard.total(), 2);
        assert!(!wizard.on_last_step());
    }

    #[test]
    fn test_advance_stores_snapshot_and_increments() {
        let mut wizard = two_step_wizard();
        let values = snapshot("age", Value::Number(25));
        let advance = wizard.advance(values.clone()).unwrap();
        assert_eq!(advance, Advance::Next);
        assert_eq!(wizard.current(), 2);
        assert_eq!(wizard.accumulated(1), Some(&values));
    }

    #[test]
    fn test_last_step_advance_completes_with_aggregate() {
        let mut wizard = two_step_wizard();
        wizard.advance(snapshot("age", Value::Number(25))).unwrap();
        let advance = wizard
            .advance(snapshot("email", Value::Text("a@b.com".into())))
            .unwrap();
        let Advance::Complete(aggregate) = advance else {
            panic!("expected completion");
        };
        assert_eq!(aggregate.get(&FieldPath::key("age")), Some(&Value::Number(25)));
        assert_eq!(
            aggregate.get(&FieldPath::key("email")),
            Some(&Value::Text("a@b.com".into()))
        );
    }

    #[test]
    fn test_retreat_keeps_accumulator() {
        let mut wizard = two_step_wizard();
        let values = snapshot("age", Value::Number(25));
        wizard.advance(values.clone()).unwrap();
        assert!(wizard.retreat());
        assert_eq!(wizard.current(), 1);
        assert_eq!(wizard.accumulated(1), Some(&values));
        // Cannot retreat past the first step
        assert!(!wizard.retreat());
        assert_eq!(wizard.current(), 1);
    }

    #[test]
    fn test_round_trip_without_edits_is_idempotent() {
        let mut wizard = two_step_wizard();
        wizard.advance(snapshot("age", Value::Number(25))).unwrap();
        wizard.retreat();

        // Re-enter the step, change nothing, submit again
        let mut form = wizard.step_form();
        let resubmitted = form.submit().expect("prior values still valid");
        wizard.advance(resubmitted).unwrap();
        assert_eq!(wizard.current(), 2);
        assert_eq!(wizard.accumulated(1), Some(&snapshot("age", Value::Number(25))));
    }

    #[test]
    fn test_step_form_prepopulates_from_accumulator() {
        let mut wizard = two_step_wizard();
        wizard.advance(snapshot("age", Value::Number(30))).unwrap();
        wizard.retreat();
        let form = wizard.step_form();
        assert_eq!(
            form.values().get(&FieldPath::key("age")),
            Some(&Value::Number(30))
        );
    }

    #[test]
    fn test_replacing_a_snapshot_does_not_mutate_the_old_one() {
        let mut wizard = two_step_wizard();
        wizard.advance(snapshot("age", Value::Number(25))).unwrap();
        let first = wizard.accumulated(1).cloned().unwrap();

        wizard.retreat();
        wizard.advance(snapshot("age", Value::Number(26))).unwrap();
        // The clone taken earlier still holds the original value
        assert_eq!(first.get(&FieldPath::key("age")), Some(&Value::Number(25)));
        assert_eq!(
            wizard.accumulated(1).unwrap().get(&FieldPath::key("age")),
            Some(&Value::Number(26))
        );
    }

    #[test]
    fn test_aggregate_rejects_overlapping_step_keys() {
        let mut wizard = Wizard::new(vec![
            StepSchema::new(1, "A").field(FieldSpec::text(FieldPath::key("name"), "Name")),
            StepSchema::new(2, "B").field(FieldSpec::text(FieldPath::key("name"), "Name")),
        ]);
        wizard.advance(snapshot("name", Value::Text("x".into()))).unwrap();
        let result = wizard.advance(snapshot("name", Value::Text("y".into())));
        assert_eq!(
            result,
            Err(AggregateError::KeyCollision("name".to_string()))
        );
    }

    #[test]
    fn test_is_completed() {
        let mut wizard = two_step_wizard();
        assert!(!wizard.is_completed(1));
        wizard.advance(snapshot("age", Value::Number(25))).unwrap();
        assert!(wizard.is_completed(1));
        assert!(!wizard.is_completed(2));
    }
}
