//! Step schema and per-step form state
//!
//! A step owns the authoritative values for its fields. Validation runs
//! on blur for the field being left, on every change for a field
//! already in error, and for every registered field on submit.

use super::binding::{apply_edit, EditContext, FieldBinding, FieldEdit};
use super::field::{FieldSpec, FieldStatus};
use super::list::{ListSpec, ListValue};
use super::path::{FieldPath, RowId, Segment};
use super::value::{FormValues, Value};
use std::collections::BTreeMap;

/// One declared element of a step, in display order
#[derive(Clone)]
pub enum StepItem {
    Field(FieldSpec),
    List(ListSpec),
}

/// Static description of one wizard step
#[derive(Clone)]
pub struct StepSchema {
    /// 1-based step number
    pub number: usize,
    pub title: String,
    items: Vec<StepItem>,
}

impl StepSchema {
    pub fn new(number: usize, title: &str) -> Self {
        Self {
            number,
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.items.push(StepItem::Field(spec));
        self
    }

    pub fn list(mut self, spec: ListSpec) -> Self {
        self.items.push(StepItem::List(spec));
        self
    }

    pub fn items(&self) -> &[StepItem] {
        &self.items
    }

    /// Fresh values with every schema key initialized
    pub fn defaults(&self) -> FormValues {
        let mut values = FormValues::new();
        for item in &self.items {
            match item {
                StepItem::Field(spec) => {
                    values.set(&spec.path, spec.default_value());
                }
                StepItem::List(spec) => {
                    let mut list = ListValue::new();
                    for _ in 0..spec.seed_rows {
                        list.push_row(spec.default_row());
                    }
                    values.set(&spec.path, Value::List(list));
                }
            }
        }
        values
    }

    pub fn list_spec(&self, path: &FieldPath) -> Option<&ListSpec> {
        self.items.iter().find_map(|item| match item {
            StepItem::List(spec) if &spec.path == path => Some(spec),
            _ => None,
        })
    }

    /// Resolve the spec of a static field or a list-row sub-field
    pub fn spec_for(&self, path: &FieldPath) -> Option<&FieldSpec> {
        for item in &self.items {
            match item {
                StepItem::Field(spec) => {
                    if &spec.path == path {
                        return Some(spec);
                    }
                }
                StepItem::List(spec) => {
                    let Some(rest) = path.strip_prefix(&spec.path) else {
                        continue;
                    };
                    let Some(Segment::Row(id)) = rest.segments().first() else {
                        continue;
                    };
                    let row_prefix = spec.path.clone().row(*id);
                    if let Some(relative) = path.strip_prefix(&row_prefix) {
                        return spec.field(&relative);
                    }
                }
            }
        }
        None
    }
}

/// What the keyboard focus is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    Field(FieldPath),
    /// The "add row" button of a list field
    ListAppend(FieldPath),
    /// The Back/Next buttons row
    Buttons,
}

/// Live state of the current step
pub struct StepForm {
    schema: StepSchema,
    values: FormValues,
    errors: BTreeMap<FieldPath, String>,
    status: BTreeMap<FieldPath, FieldStatus>,
    focus: usize,
    /// 0 = Back, 1 = Next/Submit
    selected_button: usize,
    /// Pending entry text per entries field
    buffers: BTreeMap<FieldPath, String>,
    /// Highlighted option of the focused multi-select field
    option_cursor: usize,
}

impl StepForm {
    /// Mount the step with schema defaults
    pub fn new(schema: StepSchema) -> Self {
        let values = schema.defaults();
        Self::mounted(schema, values)
    }

    /// Mount the step with previously accumulated values. The supplied
    /// snapshot fully replaces the defaults; nothing is merged.
    pub fn with_values(schema: StepSchema, prior: FormValues) -> Self {
        Self::mounted(schema, prior)
    }

    fn mounted(schema: StepSchema, values: FormValues) -> Self {
        Self {
            schema,
            values,
            errors: BTreeMap::new(),
            status: BTreeMap::new(),
            focus: 0,
            selected_button: 1,
            buffers: BTreeMap::new(),
            option_cursor: 0,
        }
    }

    pub fn schema(&self) -> &StepSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn status(&self, path: &FieldPath) -> FieldStatus {
        self.status.get(path).copied().unwrap_or_default()
    }

    /// Read view of one field for rendering
    pub fn binding(&self, path: &FieldPath) -> Option<FieldBinding<'_>> {
        let spec = self.schema.spec_for(path)?;
        let value = self.values.get(path)?;
        Some(FieldBinding {
            spec,
            value,
            error: self.error(path),
            status: self.status(path),
            pending: self.buffers.get(path).map(String::as_str).unwrap_or(""),
            option_cursor: self.option_cursor,
        })
    }

    /// Everything the focus can land on, in display order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = Vec::new();
        for item in self.schema.items() {
            match item {
                StepItem::Field(spec) => targets.push(FocusTarget::Field(spec.path.clone())),
                StepItem::List(spec) => {
                    let ids = self
                        .values
                        .get(&spec.path)
                        .and_then(Value::as_list)
                        .map(ListValue::ids)
                        .unwrap_or_default();
                    for id in ids {
                        for sub in &spec.fields {
                            let path = spec.path.clone().row(id).join(&sub.path);
                            targets.push(FocusTarget::Field(path));
                        }
                    }
                    targets.push(FocusTarget::ListAppend(spec.path.clone()));
                }
            }
        }
        targets.push(FocusTarget::Buttons);
        targets
    }

    /// Every validatable field currently registered, including list-row
    /// sub-fields
    pub fn registered_paths(&self) -> Vec<FieldPath> {
        self.focus_targets()
            .into_iter()
            .filter_map(|target| match target {
                FocusTarget::Field(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn focused(&self) -> FocusTarget {
        let targets = self.focus_targets();
        targets
            .get(self.focus.min(targets.len() - 1))
            .cloned()
            .unwrap_or(FocusTarget::Buttons)
    }

    pub fn on_buttons_row(&self) -> bool {
        matches!(self.focused(), FocusTarget::Buttons)
    }

    pub fn selected_button(&self) -> usize {
        self.selected_button
    }

    pub fn select_back_button(&mut self) {
        self.selected_button = 0;
    }

    pub fn select_next_button(&mut self) {
        self.selected_button = 1;
    }

    /// Move focus forward; leaving a field triggers its blur validation
    pub fn focus_next(&mut self) {
        let targets = self.focus_targets();
        let left = targets.get(self.focus).cloned();
        self.focus = (self.focus + 1) % targets.len();
        self.leave(left);
    }

    /// Move focus backward; leaving a field triggers its blur validation
    pub fn focus_prev(&mut self) {
        let targets = self.focus_targets();
        let left = targets.get(self.focus).cloned();
        self.focus = if self.focus == 0 {
            targets.len() - 1
        } else {
            self.focus - 1
        };
        self.leave(left);
    }

    fn leave(&mut self, target: Option<FocusTarget>) {
        self.option_cursor = 0;
        if let Some(FocusTarget::Field(path)) = target {
            self.validate_field(&path);
        }
    }

    /// Apply a semantic edit to the focused field. A field already in
    /// error re-validates on every change.
    pub fn apply(&mut self, edit: FieldEdit) {
        let FocusTarget::Field(path) = self.focused() else {
            return;
        };
        let Some(kind) = self.schema.spec_for(&path).map(|spec| spec.kind.clone()) else {
            return;
        };
        let Some(value) = self.values.get_mut(&path) else {
            return;
        };
        let buffer = self.buffers.entry(path.clone()).or_default();
        let changed = apply_edit(
            &kind,
            value,
            EditContext {
                buffer,
                cursor: &mut self.option_cursor,
            },
            edit,
        );
        if changed && self.errors.contains_key(&path) {
            self.validate_field(&path);
        }
    }

    /// Validate one field against its rule set
    pub fn validate_field(&mut self, path: &FieldPath) {
        let Some(spec) = self.schema.spec_for(path) else {
            return;
        };
        let Some(value) = self.values.get(path) else {
            return;
        };
        self.status.insert(path.clone(), FieldStatus::Validating);
        match spec.rules.validate(value) {
            Some(message) => {
                self.errors.insert(path.clone(), message);
                self.status.insert(path.clone(), FieldStatus::Invalid);
            }
            None => {
                self.errors.remove(path);
                self.status.insert(path.clone(), FieldStatus::Valid);
            }
        }
    }

    /// Whole-step validation: every registered field, regardless of
    /// touch state. On success returns the full snapshot; on failure
    /// focus jumps to the first offending field.
    pub fn submit(&mut self) -> Option<FormValues> {
        let paths = self.registered_paths();
        for path in &paths {
            self.status.insert(path.clone(), FieldStatus::Validating);
        }
        for path in &paths {
            self.validate_field(path);
        }
        if self.errors.is_empty() {
            return Some(self.values.clone());
        }
        let targets = self.focus_targets();
        if let Some(index) = targets.iter().position(
            |t| matches!(t, FocusTarget::Field(path) if self.errors.contains_key(path)),
        ) {
            self.focus = index;
        }
        None
    }

    /// List field containing the focus, if any (directly on a row
    /// sub-field or on the list's add button)
    pub fn focused_list(&self) -> Option<FieldPath> {
        match self.focused() {
            FocusTarget::ListAppend(path) => Some(path),
            FocusTarget::Field(path) => {
                path.row_id()?;
                self.schema.items().iter().find_map(|item| match item {
                    StepItem::List(spec) if path.starts_with(&spec.path) => {
                        Some(spec.path.clone())
                    }
                    _ => None,
                })
            }
            FocusTarget::Buttons => None,
        }
    }

    /// Append a default row and focus its first sub-field
    pub fn append_row(&mut self, list_path: &FieldPath) -> Option<RowId> {
        let spec = self.schema.list_spec(list_path)?;
        let row = spec.default_row();
        let first_sub = spec.fields.first().map(|f| f.path.clone());
        let list = self.values.get_mut(list_path)?.as_list_mut()?;
        let id = list.push_row(row);
        if let Some(sub) = first_sub {
            let target = FocusTarget::Field(list_path.clone().row(id).join(&sub));
            if let Some(index) = self.focus_targets().iter().position(|t| t == &target) {
                self.focus = index;
            }
        }
        Some(id)
    }

    /// Remove the row the focus is on. Validation state of other rows
    /// stays attached to their identities.
    pub fn remove_focused_row(&mut self) -> bool {
        let FocusTarget::Field(path) = self.focused() else {
            return false;
        };
        let Some(id) = path.row_id() else {
            return false;
        };
        let Some(list_path) = self.focused_list() else {
            return false;
        };
        let Some(list) = self.values.get_mut(&list_path).and_then(Value::as_list_mut) else {
            return false;
        };
        if !list.remove_row(id) {
            return false;
        }
        let row_prefix = list_path.row(id);
        self.errors.retain(|p, _| !p.starts_with(&row_prefix));
        self.status.retain(|p, _| !p.starts_with(&row_prefix));
        self.buffers.retain(|p, _| !p.starts_with(&row_prefix));
        let len = self.focus_targets().len();
        self.focus = self.focus.min(len - 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::rules::FieldRules;
    use pretty_assertions::assert_eq;

    fn personal_schema() -> StepSchema {
        StepSchema::new(1, "Personal")
            .field(
                FieldSpec::text(FieldPath::key("first_name"), "First name").rules(
                    FieldRules::new()
                        .required("First name is required")
                        .min_length(2, "First name must be at least 2 characters"),
                ),
            )
            .field(
                FieldSpec::number(FieldPath::key("age"), "Age")
                    .default_to(Value::Number(22))
                    .rules(
                        FieldRules::new()
                            .required("Age is required")
                            .min(1, "Age must be greater than 0")
                            .max(120, "Age must be at most 120"),
                    ),
            )
    }

    fn skills_schema() -> StepSchema {
        StepSchema::new(3, "Review").list(ListSpec::new(
            FieldPath::key("skills"),
            "Skills",
            "Skill",
            vec![
                FieldSpec::text(FieldPath::key("name"), "Skill name")
                    .rules(FieldRules::new().required("Skill name is required")),
                FieldSpec::select(
                    FieldPath::key("level"),
                    "Level",
                    &[("beginner", "Beginner"), ("expert", "Expert")],
                )
                .default_to(Value::Text("beginner".into())),
            ],
        ))
    }

    fn type_text(form: &mut StepForm, text: &str) {
        for c in text.chars() {
            form.apply(FieldEdit::Insert(c));
        }
    }

    #[test]
    fn test_mount_initializes_every_schema_key() {
        let form = StepForm::new(personal_schema());
        assert_eq!(
            form.values().get(&FieldPath::key("first_name")),
            Some(&Value::Text(String::new()))
        );
        assert_eq!(
            form.values().get(&FieldPath::key("age")),
            Some(&Value::Number(22))
        );
    }

    #[test]
    fn test_untouched_until_blur() {
        let mut form = StepForm::new(personal_schema());
        assert_eq!(form.status(&FieldPath::key("first_name")), FieldStatus::Untouched);
        type_text(&mut form, "A");
        // No blur yet, still untouched and error-free
        assert_eq!(form.status(&FieldPath::key("first_name")), FieldStatus::Untouched);
        assert_eq!(form.error(&FieldPath::key("first_name")), None);
    }

    #[test]
    fn test_blur_validates_the_left_field() {
        let mut form = StepForm::new(personal_schema());
        type_text(&mut form, "A");
        form.focus_next();
        assert_eq!(form.status(&FieldPath::key("first_name")), FieldStatus::Invalid);
        assert_eq!(
            form.error(&FieldPath::key("first_name")),
            Some("First name must be at least 2 characters")
        );
    }

    #[test]
    fn test_field_in_error_revalidates_on_change() {
        let mut form = StepForm::new(personal_schema());
        type_text(&mut form, "A");
        form.focus_next();
        form.focus_prev();
        assert!(form.error(&FieldPath::key("first_name")).is_some());

        // The next keystroke clears the error without another blur
        type_text(&mut form, "d");
        assert_eq!(form.error(&FieldPath::key("first_name")), None);
        assert_eq!(form.status(&FieldPath::key("first_name")), FieldStatus::Valid);
    }

    #[test]
    fn test_submit_blocks_on_required_empty() {
        let mut form = StepForm::new(personal_schema());
        assert!(form.submit().is_none());
        assert_eq!(
            form.error(&FieldPath::key("first_name")),
            Some("First name is required")
        );
        // Age has its default and passes
        assert_eq!(form.error(&FieldPath::key("age")), None);
        // Focus jumped to the offending field
        assert_eq!(
            form.focused(),
            FocusTarget::Field(FieldPath::key("first_name"))
        );
    }

    #[test]
    fn test_submit_age_zero_blocks_with_message() {
        let mut form = StepForm::new(personal_schema());
        type_text(&mut form, "Ada");
        form.focus_next(); // onto age
        form.apply(FieldEdit::Backspace);
        form.apply(FieldEdit::Backspace); // age now Empty
        type_text(&mut form, "0");
        assert!(form.submit().is_none());
        assert_eq!(
            form.error(&FieldPath::key("age")),
            Some("Age must be greater than 0")
        );
    }

    #[test]
    fn test_submit_returns_full_snapshot() {
        let mut form = StepForm::new(personal_schema());
        type_text(&mut form, "Ada");
        form.focus_next();
        form.apply(FieldEdit::Backspace);
        form.apply(FieldEdit::Backspace);
        type_text(&mut form, "25");

        let snapshot = form.submit().expect("step should submit");
        assert_eq!(snapshot.get(&FieldPath::key("age")), Some(&Value::Number(25)));
        assert_eq!(
            snapshot.get(&FieldPath::key("first_name")),
            Some(&Value::Text("Ada".into()))
        );
    }

    #[test]
    fn test_reentry_fully_replaces_values() {
        let mut prior = personal_schema().defaults();
        prior.set(&FieldPath::key("first_name"), Value::Text("Ada".into()));
        prior.set(&FieldPath::key("age"), Value::Number(30));

        let form = StepForm::with_values(personal_schema(), prior.clone());
        assert_eq!(form.values(), &prior);
        assert_eq!(form.error_count(), 0);
        assert_eq!(form.status(&FieldPath::key("age")), FieldStatus::Untouched);
    }

    #[test]
    fn test_focus_targets_cover_list_rows_and_buttons() {
        let form = StepForm::new(skills_schema());
        let targets = form.focus_targets();
        // One seeded row: name + level, then add button, then buttons row
        assert_eq!(targets.len(), 4);
        assert!(matches!(targets[2], FocusTarget::ListAppend(_)));
        assert_eq!(targets[3], FocusTarget::Buttons);
    }

    #[test]
    fn test_append_row_focuses_new_first_sub_field() {
        let mut form = StepForm::new(skills_schema());
        let id = form.append_row(&FieldPath::key("skills")).unwrap();
        let expected = FieldPath::key("skills").row(id).then("name");
        assert_eq!(form.focused(), FocusTarget::Field(expected));
        assert_eq!(form.focus_targets().len(), 6);
    }

    #[test]
    fn test_remove_keeps_other_rows_errors_attached() {
        let mut form = StepForm::new(skills_schema());
        let ids = form
            .values()
            .get(&FieldPath::key("skills"))
            .and_then(Value::as_list)
            .map(ListValue::ids)
            .unwrap();
        let first = ids[0];
        let second = form.append_row(&FieldPath::key("skills")).unwrap();

        // Fill the second row's name, leave the first empty, validate all
        type_text(&mut form, "Rust");
        assert!(form.submit().is_none());
        let first_name = FieldPath::key("skills").row(first).then("name");
        let second_name = FieldPath::key("skills").row(second).then("name");
        assert!(form.error(&first_name).is_some());
        assert!(form.error(&second_name).is_none());

        // Remove the first (failing) row: the survivor keeps its clean
        // state and its value
        form.focus = 0; // first row's name field
        assert!(form.remove_focused_row());
        assert!(form.error(&first_name).is_none());
        assert_eq!(form.error_count(), 0);
        assert_eq!(
            form.values().get(&second_name),
            Some(&Value::Text("Rust".into()))
        );
        let remaining = form
            .values()
            .get(&FieldPath::key("skills"))
            .and_then(Value::as_list)
            .map(ListValue::len);
        assert_eq!(remaining, Some(1));
    }

    #[test]
    fn test_append_then_remove_round_trip_is_clean() {
        let mut form = StepForm::new(skills_schema());
        type_text(&mut form, "Rust"); // seeded row name
        let id = form.append_row(&FieldPath::key("skills")).unwrap();
        assert_eq!(form.focused(), FocusTarget::Field(FieldPath::key("skills").row(id).then("name")));
        assert!(form.remove_focused_row());

        let list = form
            .values()
            .get(&FieldPath::key("skills"))
            .and_then(Value::as_list)
            .cloned()
            .unwrap();
        assert_eq!(list.len(), 1);
        let survivor = list.ids()[0];
        assert_eq!(
            form.values()
                .get(&FieldPath::key("skills").row(survivor).then("name")),
            Some(&Value::Text("Rust".into()))
        );
    }

    #[test]
    fn test_buttons_row_is_not_editable() {
        let mut form = StepForm::new(personal_schema());
        while !form.on_buttons_row() {
            form.focus_next();
        }
        // Editing on the buttons row is a no-op
        form.apply(FieldEdit::Insert('x'));
        assert_eq!(
            form.values().get(&FieldPath::key("first_name")),
            Some(&Value::Text(String::new()))
        );
    }
}
