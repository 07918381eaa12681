//! Structural and business-rule validation of requested services.
//!
//! Everything here is pure: the taxonomy and the reference date are passed
//! in, so the rules can be exercised without a network or a real clock.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{ConnectError, Result};
use crate::model::{InputData, InputValue, ServiceConfig, TimeRange};
use crate::taxonomy::SupportedTaxonomy;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of the validation rules that are not part of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Date considered "today" for time frame checks.
    pub today: NaiveDate,
    /// Only this service may carry a time frame.
    pub time_frame_service: String,
}

impl ValidationRules {
    pub fn new(today: NaiveDate, time_frame_service: impl Into<String>) -> Self {
        Self {
            today,
            time_frame_service: time_frame_service.into().to_lowercase(),
        }
    }

    /// Rules evaluated against the local calendar date.
    pub fn for_today(time_frame_service: impl Into<String>) -> Self {
        Self::new(Local::now().date_naive(), time_frame_service)
    }
}

/// Validate `raw` against `taxonomy` and return the cleaned mapping.
///
/// Keys are lowercased. Values are never rewritten, only checked. Failures
/// inside a supported service surface before the list of unsupported
/// service names is reported.
pub fn validate_input_data(
    raw: &InputData,
    taxonomy: &SupportedTaxonomy,
    rules: &ValidationRules,
) -> Result<InputData> {
    let input = normalize_keys(raw)?;

    if input.is_empty() {
        return Err(ConnectError::invalid_service("At least one service is needed."));
    }

    let mut clean = InputData::with_capacity(input.len());
    let mut unsupported_services = Vec::new();

    for (name, value) in input {
        if !taxonomy.supports_service(&name) {
            unsupported_services.push(name);
            continue;
        }

        match &value {
            InputValue::Flag(false) => {
                return Err(ConnectError::invalid_service(
                    "At least one service has to be required",
                ));
            }
            InputValue::Flag(true) => {}
            InputValue::Service(config) => validate_service(&name, config, taxonomy, rules)?,
        }
        clean.insert(name, value);
    }

    if !unsupported_services.is_empty() {
        return Err(ConnectError::invalid_service(format!(
            "These services [ {} ] are unsupported",
            unsupported_services.join(", ")
        )));
    }

    Ok(clean)
}

/// At least one entry must be an enabled flag or a config with `required`.
pub fn ensure_required_service(data: &InputData) -> Result<()> {
    if data.values().any(InputValue::is_required) {
        Ok(())
    } else {
        Err(ConnectError::invalid_service(
            "At least one service must have the required property set to true",
        ))
    }
}

fn normalize_keys(raw: &InputData) -> Result<InputData> {
    let mut normalized = InputData::with_capacity(raw.len());
    for (key, value) in raw {
        let name = key.to_lowercase();
        if normalized.contains_key(&name) {
            return Err(ConnectError::invalid_service(format!(
                "Service '{name}' is specified more than once"
            )));
        }
        normalized.insert(name, value.clone());
    }
    Ok(normalized)
}

fn validate_service(
    name: &str,
    config: &ServiceConfig,
    taxonomy: &SupportedTaxonomy,
    rules: &ValidationRules,
) -> Result<()> {
    if config.traits().is_empty() && config.activities().is_empty() {
        return Err(ConnectError::invalid_service(
            "At least one trait or activity is required",
        ));
    }

    if let Some(time_frame) = &config.time_frame {
        if name != rules.time_frame_service {
            return Err(ConnectError::invalid_service(format!(
                "TimeFrame is only applicable for the '{}' service",
                rules.time_frame_service
            )));
        }
        validate_time_frame(time_frame, rules.today)?;
    }

    let unsupported_activities: Vec<&str> = config
        .activities()
        .iter()
        .filter(|a| !taxonomy.supports_activity(a))
        .map(String::as_str)
        .collect();
    let unsupported_traits: Vec<&str> = config
        .traits()
        .iter()
        .filter(|t| !taxonomy.supports_trait(t))
        .map(String::as_str)
        .collect();

    let mut problems = Vec::new();
    if !unsupported_activities.is_empty() {
        problems.push(format!(
            "These activities [ {} ] are unsupported",
            unsupported_activities.join(", ")
        ));
    }
    if !unsupported_traits.is_empty() {
        problems.push(format!(
            "These traits [ {} ] are unsupported",
            unsupported_traits.join(", ")
        ));
    }
    if !problems.is_empty() {
        return Err(ConnectError::invalid_service(problems.join("; ")));
    }

    Ok(())
}

fn validate_time_frame(time_frame: &TimeRange, today: NaiveDate) -> Result<()> {
    let parse = |s: &Option<String>| {
        s.as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
    };
    let (Some(start), Some(end)) = (parse(&time_frame.start_date), parse(&time_frame.end_date))
    else {
        return Err(ConnectError::invalid_time_frame(
            "Invalid date format for startDate or endDate",
        ));
    };

    if end > today {
        return Err(ConnectError::invalid_time_frame(
            "endDate should not be after the current date",
        ));
    }

    if end.year() != today.year() {
        return Err(ConnectError::invalid_time_frame(
            "endDate should fall within the current year",
        ));
    }

    if start >= end {
        return Err(ConnectError::invalid_time_frame(
            "startDate should be before endDate",
        ));
    }

    // At most two calendar years: the end year and the one before it.
    if end.year() - start.year() > 1 {
        let allowed_start = NaiveDate::from_ymd_opt(end.year() - 1, 1, 1)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        return Err(ConnectError::invalid_time_frame(format!(
            "Invalid timeframe. Allowed range is from {allowed_start} to {}",
            today.format(DATE_FORMAT)
        )));
    }

    Ok(())
}
