// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BMI calculator screen state and history persistence.
//!
//! Signed-out users get a transient result only. Signed-in users also get
//! every calculation stored, and the history is re-read in full after each
//! mutation instead of being patched locally.

use crate::bmi::{self, BmiResult};
use crate::db::{collections, to_data, CollectionPath, DocumentStore, Filter};
use crate::error::AppError;
use crate::models::{BmiRecord, Gender};
use crate::session::Session;
use crate::time_utils::format_utc_rfc3339;
use std::sync::Arc;

/// State behind the BMI calculator screen.
pub struct BmiScreen {
    store: Arc<dyn DocumentStore>,
    session: Session,
    gender: Option<Gender>,
    height_cm: f64,
    weight: String,
    age: String,
    result: Option<BmiResult>,
    history: Vec<BmiRecord>,
    alert: Option<String>,
}

impl BmiScreen {
    pub fn new(store: Arc<dyn DocumentStore>, session: Session, default_height_cm: f64) -> Self {
        Self {
            store,
            session,
            gender: None,
            height_cm: bmi::clamp_height(default_height_cm),
            weight: String::new(),
            age: String::new(),
            result: None,
            history: Vec::new(),
            alert: None,
        }
    }

    fn path() -> CollectionPath {
        CollectionPath::root(collections::BMI_RECORDS)
    }

    pub fn set_weight(&mut self, text: &str) {
        self.weight = bmi::sanitize_weight(text);
    }

    pub fn set_age(&mut self, text: &str) {
        self.age = bmi::sanitize_age(text);
    }

    pub fn set_height(&mut self, height_cm: f64) {
        self.height_cm = bmi::clamp_height(height_cm);
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.gender = gender;
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn height(&self) -> f64 {
        self.height_cm
    }

    pub fn result(&self) -> Option<&BmiResult> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &[BmiRecord] {
        &self.history
    }

    /// Pending blocking alert, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Validate, compute and classify; store the record when signed in.
    ///
    /// A validation failure leaves the displayed result and history
    /// untouched. A storage failure keeps the computed result on screen and
    /// raises an alert.
    pub async fn calculate(&mut self) -> Result<BmiResult, AppError> {
        let (weight, age) = match bmi::validate_inputs(&self.weight, &self.age) {
            Ok(values) => values,
            Err(err) => {
                tracing::debug!(error = %err, "BMI input rejected");
                self.alert = Some(err.to_string());
                return Err(AppError::Validation(err.to_string()));
            }
        };

        let result = BmiResult::new(weight, self.height_cm);
        self.result = Some(result);
        self.alert = None;

        let Some(uid) = self.session.uid() else {
            return Ok(result);
        };

        let record = BmiRecord {
            id: None,
            gender: self.gender,
            height: self.height_cm,
            weight,
            age,
            bmi: result.bmi,
            date: format_utc_rfc3339(chrono::Utc::now()),
            user_id: Some(uid.clone()),
        };

        if let Err(err) = self.save_and_reload(&uid, &record).await {
            self.alert = Some(err.user_message());
            return Err(err);
        }
        Ok(result)
    }

    async fn save_and_reload(&mut self, uid: &str, record: &BmiRecord) -> Result<(), AppError> {
        let id = self
            .store
            .create_record(&Self::path(), to_data(record)?)
            .await?;
        tracing::info!(uid, id = %id, bmi = record.bmi, "BMI record saved");
        self.reload(uid).await
    }

    /// Clear the displayed result. Nothing is deleted.
    pub fn recalculate(&mut self) {
        self.result = None;
    }

    /// Re-read the signed-in user's history, newest first.
    ///
    /// Signed-out users have no history.
    pub async fn load_history(&mut self) -> Result<&[BmiRecord], AppError> {
        match self.session.uid() {
            Some(uid) => {
                if let Err(err) = self.reload(&uid).await {
                    self.alert = Some(err.user_message());
                    return Err(err);
                }
            }
            None => self.history.clear(),
        }
        Ok(&self.history)
    }

    /// Delete one stored record, then re-read the history.
    pub async fn delete_record(&mut self, id: &str) -> Result<(), AppError> {
        let Some(uid) = self.session.uid() else {
            return Err(AppError::Unauthorized);
        };

        let result = async {
            self.store.delete_record(&Self::path(), id).await?;
            tracing::info!(uid = %uid, id, "BMI record deleted");
            self.reload(&uid).await
        }
        .await;

        if let Err(err) = &result {
            self.alert = Some(err.user_message());
        }
        result
    }

    async fn reload(&mut self, uid: &str) -> Result<(), AppError> {
        let docs = self
            .store
            .read_records(&Self::path(), Some(&Filter::eq("userId", uid)))
            .await?;

        let mut records = docs
            .into_iter()
            .map(|doc| doc.decode::<BmiRecord>())
            .collect::<Result<Vec<_>, _>>()?;
        // RFC 3339 UTC timestamps sort chronologically as strings
        records.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!(uid, count = records.len(), "BMI history loaded");
        self.history = records;
        Ok(())
    }
}
