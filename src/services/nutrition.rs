// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition goals.
//!
//! A user has at most one active goal. Activating a goal and deactivating
//! all the others is a single atomic batch, so readers never observe two
//! active goals or none in between.

use crate::db::{collections, to_data, BatchOp, CollectionPath, DocumentStore};
use crate::error::AppError;
use crate::forms::FieldErrors;
use crate::models::{Meal, MealLevel, NutritionGoal};
use crate::services::workouts::parse_routine;
use crate::session::Session;
use crate::time_utils::{epoch_millis, format_utc_rfc3339};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Document id for a new goal: slug of the name plus a millisecond timestamp.
pub fn slugify(name: &str, timestamp_ms: i64) -> String {
    let mut slug = String::new();
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "goal" } else { slug };
    urlencoding::encode(&format!("{}-{}", slug, timestamp_ms)).into_owned()
}

/// Built-in plans a user can start from.
pub struct GoalTemplate {
    pub name: &'static str,
    pub calories: &'static str,
    pub img: &'static str,
    pub meals: [(Meal, &'static str, MealLevel); 4],
    pub tips: &'static [&'static str],
}

pub const TEMPLATES: [GoalTemplate; 3] = [
    GoalTemplate {
        name: "Weight Loss",
        calories: "1800",
        img: "weight_loss.png",
        meals: [
            (Meal::Breakfast, "Greek yogurt with berries", MealLevel::Easy),
            (Meal::Lunch, "Grilled chicken salad", MealLevel::Easy),
            (Meal::Dinner, "Baked salmon with steamed vegetables", MealLevel::Medium),
            (Meal::Snacks, "Apple slices with almonds", MealLevel::Easy),
        ],
        tips: &[
            "Drink a glass of water before each meal.",
            "Fill half your plate with vegetables.",
        ],
    },
    GoalTemplate {
        name: "Muscle Gain",
        calories: "2800",
        img: "muscle_gain.png",
        meals: [
            (Meal::Breakfast, "Oats with whey and banana", MealLevel::Easy),
            (Meal::Lunch, "Rice, beef and broccoli", MealLevel::Medium),
            (Meal::Dinner, "Chicken pasta with spinach", MealLevel::Medium),
            (Meal::Snacks, "Peanut butter toast and milk", MealLevel::Easy),
        ],
        tips: &[
            "Eat protein with every meal.",
            "Have a carb and protein snack after training.",
        ],
    },
    GoalTemplate {
        name: "Balanced Diet",
        calories: "2200",
        img: "balanced.png",
        meals: [
            (Meal::Breakfast, "Whole-grain toast with eggs", MealLevel::Easy),
            (Meal::Lunch, "Quinoa bowl with chickpeas", MealLevel::Medium),
            (Meal::Dinner, "Stir-fried tofu with vegetables", MealLevel::Medium),
            (Meal::Snacks, "Hummus with carrot sticks", MealLevel::Easy),
        ],
        tips: &["Eat a variety of colours.", "Limit added sugar and processed food."],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NutritionField {
    Name,
    Calories,
}

/// Add/edit goal form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionForm {
    /// Set when editing an existing goal
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub name: String,
    pub calories: String,
    pub img: Option<String>,
    pub is_active: bool,
    pub meals: BTreeMap<Meal, String>,
    pub meal_levels: BTreeMap<Meal, MealLevel>,
    pub tips_text: String,
}

impl NutritionForm {
    pub fn edit(goal: &NutritionGoal) -> Self {
        Self {
            id: Some(goal.id.clone()),
            created_at: Some(goal.created_at.clone()),
            name: goal.name.clone(),
            calories: goal.calories.clone(),
            img: goal.img.clone(),
            is_active: goal.is_active,
            meals: Meal::ALL
                .iter()
                .map(|&m| (m, goal.meal(m).to_string()))
                .collect(),
            meal_levels: goal.meal_levels.clone(),
            tips_text: goal.tips.join("\n"),
        }
    }

    pub fn from_template(template: &GoalTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            calories: template.calories.to_string(),
            img: Some(template.img.to_string()),
            meals: template
                .meals
                .iter()
                .map(|(m, text, _)| (*m, text.to_string()))
                .collect(),
            meal_levels: template
                .meals
                .iter()
                .map(|(m, _, level)| (*m, *level))
                .collect(),
            tips_text: template.tips.join("\n"),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> FieldErrors<NutritionField> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.set(NutritionField::Name, "Please enter a goal name.");
        }
        if self.calories.trim().is_empty() {
            errors.set(NutritionField::Calories, "Please enter daily calories.");
        }
        errors
    }

    /// Build the goal; ids and timestamps are assigned when saved.
    pub fn to_goal(&self) -> Result<NutritionGoal, FieldErrors<NutritionField>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let meal = |m: Meal| self.meals.get(&m).map(|s| s.trim().to_string()).unwrap_or_default();
        Ok(NutritionGoal {
            id: self.id.clone().unwrap_or_default(),
            name: self.name.trim().to_string(),
            calories: self.calories.trim().to_string(),
            img: self.img.clone(),
            is_active: self.is_active,
            breakfast: meal(Meal::Breakfast),
            lunch: meal(Meal::Lunch),
            dinner: meal(Meal::Dinner),
            snacks: meal(Meal::Snacks),
            meal_levels: self.meal_levels.clone(),
            tips: parse_routine(&self.tips_text),
            created_at: self.created_at.clone().unwrap_or_default(),
            updated_at: String::new(),
        })
    }
}

/// Nutrition goal persistence for the signed-in user.
#[derive(Clone)]
pub struct NutritionService {
    store: Arc<dyn DocumentStore>,
    session: Session,
}

impl NutritionService {
    pub fn new(store: Arc<dyn DocumentStore>, session: Session) -> Self {
        Self { store, session }
    }

    fn path(uid: &str) -> CollectionPath {
        CollectionPath::user_scoped(uid, collections::NUTRITION_GOALS)
    }

    fn require_uid(&self) -> Result<String, AppError> {
        self.session.uid().ok_or(AppError::Unauthorized)
    }

    /// All goals, newest first.
    pub async fn list(&self) -> Result<Vec<NutritionGoal>, AppError> {
        let uid = self.require_uid()?;
        let docs = self.store.read_records(&Self::path(&uid), None).await?;
        let mut goals = docs
            .into_iter()
            .map(|doc| doc.decode::<NutritionGoal>())
            .collect::<Result<Vec<_>, _>>()?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(uid = %uid, count = goals.len(), "Nutrition goals loaded");
        Ok(goals)
    }

    pub async fn active_goal(&self) -> Result<Option<NutritionGoal>, AppError> {
        Ok(self.list().await?.into_iter().find(|g| g.is_active))
    }

    /// Create (empty id) or update a goal. Returns the stored goal.
    pub async fn save(&self, goal: NutritionGoal) -> Result<NutritionGoal, AppError> {
        self.save_at(goal, Utc::now()).await
    }

    async fn save_at(
        &self,
        mut goal: NutritionGoal,
        now: DateTime<Utc>,
    ) -> Result<NutritionGoal, AppError> {
        let uid = self.require_uid()?;
        let path = Self::path(&uid);
        let timestamp = format_utc_rfc3339(now);

        if goal.id.is_empty() {
            goal.id = slugify(&goal.name, epoch_millis(now));
        }
        if goal.created_at.is_empty() {
            goal.created_at = timestamp.clone();
        }
        goal.updated_at = timestamp;

        let target = BatchOp {
            path: path.clone(),
            id: goal.id.clone(),
            data: to_data(&goal)?,
            merge: true,
        };

        if goal.is_active {
            self.write_exclusive(&uid, &goal.id, target, false).await?;
        } else {
            self.store
                .update_record(&path, &target.id, target.data, true)
                .await?;
        }

        tracing::info!(uid = %uid, id = %goal.id, active = goal.is_active, "Nutrition goal saved");
        Ok(goal)
    }

    /// Make one stored goal the active goal.
    pub async fn set_active(&self, id: &str) -> Result<(), AppError> {
        let uid = self.require_uid()?;
        let target = BatchOp {
            path: Self::path(&uid),
            id: id.to_string(),
            data: json!({
                "isActive": true,
                "updatedAt": format_utc_rfc3339(Utc::now()),
            }),
            merge: true,
        };
        self.write_exclusive(&uid, id, target, true).await?;
        tracing::info!(uid = %uid, id, "Nutrition goal activated");
        Ok(())
    }

    /// Write `target` and deactivate every other goal in one batch.
    ///
    /// With `must_exist`, a target missing from the collection is refused
    /// instead of being created as a partial document.
    async fn write_exclusive(
        &self,
        uid: &str,
        id: &str,
        target: BatchOp,
        must_exist: bool,
    ) -> Result<(), AppError> {
        let path = Self::path(uid);
        let docs = self.store.read_records(&path, None).await?;

        if must_exist && !docs.iter().any(|doc| doc.id == id) {
            tracing::warn!(uid, id, "Cannot activate missing nutrition goal");
            return Err(AppError::NotFound(format!("Nutrition goal {}", id)));
        }

        let mut ops = vec![target];
        ops.extend(docs.into_iter().filter(|doc| doc.id != id).map(|doc| BatchOp {
            path: path.clone(),
            id: doc.id,
            data: json!({ "isActive": false }),
            merge: true,
        }));

        self.store.batch_write(ops).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let uid = self.require_uid()?;
        self.store.delete_record(&Self::path(&uid), id).await?;
        tracing::info!(uid = %uid, id, "Nutrition goal deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Weight Loss", 1700000000000), "weight-loss-1700000000000");
        assert_eq!(slugify("  Keto!! Plan  ", 1), "keto-plan-1");
        assert_eq!(slugify("???", 5), "goal-5");
        assert_eq!(slugify("Café", 2), "caf%C3%A9-2");
    }

    #[test]
    fn test_template_form_round_trip() {
        let form = NutritionForm::from_template(&TEMPLATES[0]);
        let goal = form.to_goal().unwrap();
        assert_eq!(goal.name, "Weight Loss");
        assert_eq!(goal.breakfast, "Greek yogurt with berries");
        assert_eq!(goal.meal_levels.get(&Meal::Dinner), Some(&MealLevel::Medium));
        assert_eq!(goal.tips.len(), 2);
        assert!(goal.id.is_empty());
    }

    #[test]
    fn test_form_requires_name_and_calories() {
        let errors = NutritionForm::default().to_goal().unwrap_err();
        assert_eq!(errors.get(NutritionField::Name), Some("Please enter a goal name."));
        assert_eq!(
            errors.get(NutritionField::Calories),
            Some("Please enter daily calories.")
        );
    }
}
