//! Input types accepted by a [`Connect`](crate::Connect) session.
//!
//! The serde representation matches the JSON payload embedded in the
//! App Clip URL, so the same shapes can be read from a file or a CLI
//! argument and written back out unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Optional date window for a service, as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl TimeRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

/// Configuration of one requested service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub traits: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Option<Vec<String>>,
    #[serde(default)]
    pub time_frame: Option<TimeRange>,
    #[serde(default = "default_true")]
    pub required: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            traits: None,
            activities: None,
            time_frame: None,
            required: true,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = Some(traits.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = Some(activities.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_time_frame(mut self, time_frame: TimeRange) -> Self {
        self.time_frame = Some(time_frame);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Traits, or an empty slice when none were given.
    pub fn traits(&self) -> &[String] {
        self.traits.as_deref().unwrap_or_default()
    }

    /// Activities, or an empty slice when none were given.
    pub fn activities(&self) -> &[String] {
        self.activities.as_deref().unwrap_or_default()
    }
}

/// Value attached to a service name: a bare on/off flag or a full config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Service(ServiceConfig),
}

impl InputValue {
    /// Whether this entry satisfies the "at least one required service" rule.
    pub fn is_required(&self) -> bool {
        match self {
            InputValue::Flag(enabled) => *enabled,
            InputValue::Service(config) => config.required,
        }
    }
}

impl From<bool> for InputValue {
    fn from(enabled: bool) -> Self {
        InputValue::Flag(enabled)
    }
}

impl From<ServiceConfig> for InputValue {
    fn from(config: ServiceConfig) -> Self {
        InputValue::Service(config)
    }
}

/// Service name -> requested configuration, in insertion order.
pub type InputData = IndexMap<String, InputValue>;

/// Colours forwarded to the App Clip. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    pub style: StylingOptions,
}

impl ConnectOptions {
    pub fn new(style: StylingOptions) -> Self {
        Self { style }
    }
}

/// Everything a caller supplies to open a [`Connect`](crate::Connect) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectInput {
    pub public_key: String,
    pub redirect_url: String,
    pub services: InputData,
    pub options: Option<ConnectOptions>,
}

impl ConnectInput {
    pub fn new(
        public_key: impl Into<String>,
        redirect_url: impl Into<String>,
        services: InputData,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            redirect_url: redirect_url.into(),
            services,
            options: None,
        }
    }

    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = Some(options);
        self
    }
}
