use crate::domain::models::schedule::ScheduleTemplate;
use crate::domain::models::slot::ScheduleSlot;
use crate::domain::ports::{ScheduleSlotRepository, ScheduleTemplateRepository};
use crate::error::AppError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

pub struct GenerateSlotsParams {
    pub template_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub overwrite_existing: bool,
}

/// A (template, date) pair that could not be regenerated because the
/// existing slot carries active bookings.
#[derive(Debug, Serialize, Clone)]
pub struct GenerationConflict {
    pub schedule_template_id: String,
    pub date: NaiveDate,
    pub active_bookings: i64,
}

#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub slots_generated: i64,
    pub conflicts: Vec<GenerationConflict>,
}

struct GenerationPlan {
    new_slots: Vec<ScheduleSlot>,
    delete_ids: Vec<String>,
    conflicts: Vec<GenerationConflict>,
}

/// Expands weekly templates into dated slots over an inclusive date range.
/// Each run commits atomically: either every planned slot lands, or none.
pub struct SlotGenerator {
    template_repo: Arc<dyn ScheduleTemplateRepository>,
    slot_repo: Arc<dyn ScheduleSlotRepository>,
    max_span_days: i64,
}

impl SlotGenerator {
    pub fn new(
        template_repo: Arc<dyn ScheduleTemplateRepository>,
        slot_repo: Arc<dyn ScheduleSlotRepository>,
        max_span_days: i64,
    ) -> Self {
        Self { template_repo, slot_repo, max_span_days }
    }

    pub async fn generate(&self, params: GenerateSlotsParams) -> Result<GenerationReport, AppError> {
        if params.template_ids.is_empty() {
            return Err(AppError::Validation("At least one template id is required".into()));
        }
        if params.start_date > params.end_date {
            return Err(AppError::Validation("Start date must not be after end date".into()));
        }
        let span_days = (params.end_date - params.start_date).num_days() + 1;
        if span_days > self.max_span_days {
            return Err(AppError::Validation(format!(
                "Date span of {} days exceeds the maximum of {}",
                span_days, self.max_span_days
            )));
        }

        let mut ids: Vec<String> = params.template_ids.clone();
        ids.sort();
        ids.dedup();

        let templates = self.template_repo.find_many(&ids).await?;
        if templates.len() != ids.len() {
            let found: HashSet<&str> = templates.iter().map(|t| t.id.as_str()).collect();
            let missing = ids.iter().find(|id| !found.contains(id.as_str()));
            return Err(AppError::NotFound(format!(
                "Schedule template not found: {}",
                missing.map(String::as_str).unwrap_or("?")
            )));
        }

        let window_start = start_of_day(params.start_date);
        let window_end = start_of_day(params.end_date) + Duration::days(1);
        let existing = self
            .slot_repo
            .list_for_generation(&ids, window_start, window_end)
            .await?;

        let plan = plan_generation(&templates, &existing, &params)?;

        self.slot_repo
            .apply_generation(&plan.delete_ids, &plan.new_slots)
            .await?;

        info!(
            generated = plan.new_slots.len(),
            replaced = plan.delete_ids.len(),
            conflicts = plan.conflicts.len(),
            "slot generation run complete"
        );

        Ok(GenerationReport {
            slots_generated: plan.new_slots.len() as i64,
            conflicts: plan.conflicts,
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).expect("midnight is always valid").and_utc()
}

fn plan_generation(
    templates: &[ScheduleTemplate],
    existing: &[(ScheduleSlot, i64)],
    params: &GenerateSlotsParams,
) -> Result<GenerationPlan, AppError> {
    // A slot's identity is (template, calendar date): a template yields at
    // most one slot per day, so a slot at a stale time-of-day still counts
    // as the existing slot for that date.
    let by_key: HashMap<(&str, NaiveDate), &(ScheduleSlot, i64)> = existing
        .iter()
        .map(|entry| {
            ((entry.0.schedule_template_id.as_str(), entry.0.start_time.date_naive()), entry)
        })
        .collect();

    let mut plan = GenerationPlan {
        new_slots: Vec::new(),
        delete_ids: Vec::new(),
        conflicts: Vec::new(),
    };

    let mut date = params.start_date;
    while date <= params.end_date {
        for template in templates {
            if !template.is_available || template.weekday()? != date.weekday() {
                continue;
            }

            let start = date.and_time(template.start()?).and_utc();
            let end = date.and_time(template.end()?).and_utc();

            match by_key.get(&(template.id.as_str(), date)) {
                None => {}
                Some((slot, active)) if params.overwrite_existing => {
                    if *active > 0 {
                        plan.conflicts.push(GenerationConflict {
                            schedule_template_id: template.id.clone(),
                            date,
                            active_bookings: *active,
                        });
                        continue;
                    }
                    plan.delete_ids.push(slot.id.clone());
                }
                // Idempotent no-op when not overwriting.
                Some(_) => continue,
            }

            plan.new_slots.push(ScheduleSlot::new(
                template.id.clone(),
                start,
                end,
                template.capacity,
                template.auto_available,
            ));
        }
        date = date.succ_opt().ok_or(AppError::Internal)?;
    }

    Ok(plan)
}
