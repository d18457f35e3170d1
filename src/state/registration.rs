//! Registration form content
//!
//! The three wizard steps: personal details, contact details with
//! nested address and emergency contact, and a review step carrying
//! the occupational extras plus the skill/experience lists.

use super::field::FieldSpec;
use super::list::ListSpec;
use super::path::FieldPath;
use super::rules::FieldRules;
use super::step::StepSchema;
use super::value::Value;

const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";
const MOBILE_PATTERN: &str = r"^1[3-9]\d{9}$";
const ZIP_PATTERN: &str = r"^\d{6}$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Minimum age accepted for membership
const ADULT_AGE: i64 = 18;

pub fn step_schemas() -> Vec<StepSchema> {
    vec![personal_step(), contact_step(), review_step()]
}

fn personal_step() -> StepSchema {
    StepSchema::new(1, "Personal")
        .field(
            FieldSpec::text(FieldPath::key("first_name"), "First name").rules(
                FieldRules::new()
                    .required("First name is required")
                    .min_length(2, "First name must be at least 2 characters"),
            ),
        )
        .field(
            FieldSpec::text(FieldPath::key("last_name"), "Last name").rules(
                FieldRules::new()
                    .required("Last name is required")
                    .min_length(1, "Last name must be at least 1 character"),
            ),
        )
        .field(
            FieldSpec::number(FieldPath::key("age"), "Age")
                .default_to(Value::Number(22))
                .rules(
                    FieldRules::new()
                        .required("Age is required")
                        .min(1, "Age must be greater than 0")
                        .max(120, "Age must be at most 120")
                        .custom(|value| match value.as_number() {
                            Some(n) if n < ADULT_AGE => {
                                Err("Members must be at least 18 years old".to_string())
                            }
                            _ => Ok(()),
                        }),
                ),
        )
        .field(
            FieldSpec::select(
                FieldPath::key("gender"),
                "Gender",
                &[("male", "Male"), ("female", "Female"), ("other", "Other")],
            )
            .rules(FieldRules::new().required("Select a gender")),
        )
}

fn contact_step() -> StepSchema {
    StepSchema::new(2, "Contact")
        .field(
            FieldSpec::text(FieldPath::key("email"), "Email").rules(
                FieldRules::new()
                    .required("Email is required")
                    .pattern(EMAIL_PATTERN, "Enter a valid email address"),
            ),
        )
        .field(
            FieldSpec::text(FieldPath::key("phone"), "Phone").rules(
                FieldRules::new()
                    .required("Phone number is required")
                    .pattern(MOBILE_PATTERN, "Enter a valid mobile number"),
            ),
        )
        .field(
            FieldSpec::text(FieldPath::key("address").then("street"), "Street").rules(
                FieldRules::new()
                    .required("Street address is required")
                    .min_length(5, "Street address must be at least 5 characters"),
            ),
        )
        .field(
            FieldSpec::text(FieldPath::key("address").then("city"), "City").rules(
                FieldRules::new()
                    .required("City is required")
                    .min_length(2, "City must be at least 2 characters"),
            ),
        )
        .field(
            FieldSpec::text(FieldPath::key("address").then("province"), "Province")
                .rules(FieldRules::new().required("Province is required")),
        )
        .field(
            FieldSpec::text(FieldPath::key("address").then("zip_code"), "Zip code")
                .rules(FieldRules::new().pattern(ZIP_PATTERN, "Enter a 6-digit zip code")),
        )
        .field(
            FieldSpec::text(
                FieldPath::key("contact").then("emergency").then("name"),
                "Emergency contact",
            )
            .rules(FieldRules::new().min_length(2, "Name must be at least 2 characters")),
        )
        .field(
            FieldSpec::text(
                FieldPath::key("contact").then("emergency").then("phone"),
                "Emergency phone",
            )
            .rules(FieldRules::new().pattern(MOBILE_PATTERN, "Enter a valid mobile number")),
        )
}

fn review_step() -> StepSchema {
    StepSchema::new(3, "Review")
        .field(
            FieldSpec::text(FieldPath::key("occupation"), "Occupation").rules(
                FieldRules::new()
                    .required("Occupation is required")
                    .min_length(2, "Occupation must be at least 2 characters"),
            ),
        )
        .field(FieldSpec::multi_select(
            FieldPath::key("interests"),
            "Interests",
            &[
                ("reading", "Reading"),
                ("sports", "Sports"),
                ("music", "Music"),
                ("travel", "Travel"),
            ],
        ))
        .field(
            FieldSpec::entries(FieldPath::key("tags"), "Tags").rules(
                FieldRules::new().custom(|value| {
                    let Some(items) = value.as_string_list() else {
                        return Ok(());
                    };
                    for (i, item) in items.iter().enumerate() {
                        if items[..i].contains(item) {
                            return Err(format!("Duplicate tag \"{item}\""));
                        }
                    }
                    Ok(())
                }),
            ),
        )
        .field(
            FieldSpec::multiline(FieldPath::key("comments"), "Comments").rules(
                FieldRules::new().max_length(500, "Comments must be at most 500 characters"),
            ),
        )
        .list(ListSpec::new(
            FieldPath::key("skills"),
            "Skills",
            "Skill",
            vec![
                FieldSpec::text(FieldPath::key("name"), "Skill name")
                    .rules(FieldRules::new().required("Skill name is required")),
                FieldSpec::select(
                    FieldPath::key("level"),
                    "Level",
                    &[
                        ("beginner", "Beginner"),
                        ("intermediate", "Intermediate"),
                        ("advanced", "Advanced"),
                        ("expert", "Expert"),
                    ],
                )
                .default_to(Value::Text("beginner".into())),
            ],
        ))
        .list(ListSpec::new(
            FieldPath::key("experience"),
            "Work experience",
            "Experience",
            vec![
                FieldSpec::text(FieldPath::key("company"), "Company")
                    .rules(FieldRules::new().required("Company is required")),
                FieldSpec::text(FieldPath::key("position"), "Position")
                    .rules(FieldRules::new().required("Position is required")),
                FieldSpec::text(FieldPath::key("from"), "From (YYYY-MM-DD)")
                    .rules(FieldRules::new().pattern(DATE_PATTERN, "Use the YYYY-MM-DD format")),
                FieldSpec::text(FieldPath::key("to"), "To (YYYY-MM-DD)")
                    .rules(FieldRules::new().pattern(DATE_PATTERN, "Use the YYYY-MM-DD format")),
                FieldSpec::multiline(FieldPath::key("summary"), "Responsibilities"),
            ],
        ))
}
