//! App Clip deep-link encoding.
//!
//! The payload is compact JSON with sorted top-level keys and fixed field
//! order inside each service, base64 encoded and appended to the App Clip
//! base URL as the `data` query parameter.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use url::Url;

use crate::error::{ConnectError, Result};
use crate::model::{InputData, InputValue, ServiceConfig, StylingOptions};

/// Top-level payload key holding the styling options. Not usable as a
/// service name.
pub const OPTIONS_KEY: &str = "options";

/// Characters escaped in `publicKey` and `redirectUrl` values. URL syntax
/// characters (`:`, `/`, `?`, `=`) pass through so the redirect URL stays
/// readable; only what would break the surrounding query is escaped.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'`');

#[derive(Serialize)]
#[serde(untagged)]
enum PayloadEntry<'a> {
    Flag(bool),
    Service(EncodedService<'a>),
    Options(&'a StylingOptions),
}

#[derive(Serialize)]
struct EncodedService<'a> {
    traits: &'a [String],
    activities: &'a [String],
    required: bool,
    #[serde(rename = "timeFrame", skip_serializing_if = "Option::is_none")]
    time_frame: Option<EncodedTimeFrame<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedTimeFrame<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

impl<'a> From<&'a ServiceConfig> for EncodedService<'a> {
    fn from(config: &'a ServiceConfig) -> Self {
        Self {
            traits: config.traits(),
            activities: config.activities(),
            required: config.required,
            time_frame: config.time_frame.as_ref().map(|tf| EncodedTimeFrame {
                start_date: tf.start_date.as_deref().unwrap_or_default(),
                end_date: tf.end_date.as_deref().unwrap_or_default(),
            }),
        }
    }
}

/// Build the JSON payload carried by the deep link.
pub fn payload_json(data: &InputData, style: Option<&StylingOptions>) -> Result<String> {
    if data.contains_key(OPTIONS_KEY) {
        return Err(ConnectError::invalid_service(format!(
            "'{OPTIONS_KEY}' is reserved and cannot be used as a service name"
        )));
    }

    let mut payload: BTreeMap<&str, PayloadEntry<'_>> = data
        .iter()
        .map(|(name, value)| {
            let entry = match value {
                InputValue::Flag(enabled) => PayloadEntry::Flag(*enabled),
                InputValue::Service(config) => PayloadEntry::Service(config.into()),
            };
            (name.as_str(), entry)
        })
        .collect();

    if let Some(style) = style {
        payload.insert(OPTIONS_KEY, PayloadEntry::Options(style));
    }

    serde_json::to_string(&payload)
        .map_err(|e| ConnectError::invalid_service(format!("Unable to serialize payload: {e}")))
}

/// Base64 of the compact JSON payload.
pub fn encode_payload(data: &InputData, style: Option<&StylingOptions>) -> Result<String> {
    let json = payload_json(data, style)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Assemble the App Clip URL: `base_url` followed by `publicKey`,
/// `redirectUrl` and `data`, in that order.
///
/// The base64 payload is appended verbatim, its alphabet is query-safe.
pub fn encode_url(
    data: &InputData,
    style: Option<&StylingOptions>,
    redirect_url: &str,
    public_key: &str,
    base_url: &str,
) -> Result<String> {
    let encoded = encode_payload(data, style)?;

    let mut url = Url::parse(base_url).map_err(|e| {
        ConnectError::invalid_redirect_url(format!("Invalid App Clip base URL {base_url}: {e}"))
    })?;
    let params = format!(
        "publicKey={}&redirectUrl={}&data={encoded}",
        utf8_percent_encode(public_key, QUERY_VALUE),
        utf8_percent_encode(redirect_url, QUERY_VALUE),
    );
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{params}"),
        _ => params,
    };
    url.set_query(Some(&query));

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_APP_CLIP_BASE_URL;
    use crate::model::TimeRange;
    use serde_json::{json, Value};

    fn sample_data() -> InputData {
        let mut data = InputData::new();
        data.insert(
            "uber".into(),
            ServiceConfig::new()
                .with_traits(["rating"])
                .with_activities(["trip"])
                .into(),
        );
        data.insert("netflix".into(), true.into());
        data
    }

    fn decode(b64: &str) -> String {
        String::from_utf8(STANDARD.decode(b64).unwrap()).unwrap()
    }

    #[test]
    fn payload_is_canonical_json() {
        let json = payload_json(&sample_data(), None).unwrap();
        assert_eq!(
            json,
            r#"{"netflix":true,"uber":{"traits":["rating"],"activities":["trip"],"required":true}}"#
        );
    }

    #[test]
    fn missing_lists_become_empty_arrays() {
        let mut data = InputData::new();
        data.insert(
            "amazon".into(),
            ServiceConfig::new()
                .with_activities(["shop"])
                .with_time_frame(TimeRange::new("2024-01-01", "2024-02-01"))
                .with_required(false)
                .into(),
        );
        let value: Value = serde_json::from_str(&payload_json(&data, None).unwrap()).unwrap();
        assert_eq!(value["amazon"]["traits"], json!([]));
        assert_eq!(value["amazon"]["required"], false);
        assert_eq!(
            value["amazon"]["timeFrame"],
            json!({"startDate": "2024-01-01", "endDate": "2024-02-01"})
        );
    }

    #[test]
    fn options_hold_only_set_colours() {
        let style = StylingOptions {
            primary_color: Some("#7949D1".into()),
            accent_color: Some("#F4F0FB".into()),
            ..Default::default()
        };
        let json = payload_json(&sample_data(), Some(&style)).unwrap();
        assert!(json.ends_with(r##""options":{"primaryColor":"#7949D1","accentColor":"#F4F0FB"},"uber":{"traits":["rating"],"activities":["trip"],"required":true}}"##));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["options"],
            json!({"primaryColor": "#7949D1", "accentColor": "#F4F0FB"})
        );
    }

    #[test]
    fn url_has_fixed_base_and_parameter_order() {
        let url = encode_url(
            &sample_data(),
            None,
            "https://example.com",
            "0xabc",
            DEFAULT_APP_CLIP_BASE_URL,
        )
        .unwrap();

        assert_eq!(
            url,
            "https://appclip.apple.com/id?p=network.gandalf.connect.Clip\
             &publicKey=0xabc\
             &redirectUrl=https://example.com\
             &data=eyJuZXRmbGl4Ijp0cnVlLCJ1YmVyIjp7InRyYWl0cyI6WyJyYXRpbmciXSwiYWN0aXZpdGllcyI6WyJ0cmlwIl0sInJlcXVpcmVkIjp0cnVlfX0="
        );

        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        let names: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["p", "publicKey", "redirectUrl", "data"]);
        assert_eq!(decode(&pairs[3].1), payload_json(&sample_data(), None).unwrap());
    }

    #[test]
    fn padding_and_redirect_are_not_escaped() {
        let mut data = InputData::new();
        data.insert("netflix".into(), true.into());
        let url = encode_url(
            &data,
            None,
            "https://example.com",
            "0xabc",
            DEFAULT_APP_CLIP_BASE_URL,
        )
        .unwrap();

        assert!(url.contains("&redirectUrl=https://example.com&"));
        assert!(url.ends_with("&data=eyJuZXRmbGl4Ijp0cnVlfQ=="));
    }

    #[test]
    fn query_breaking_characters_are_escaped() {
        let url = encode_url(
            &sample_data(),
            None,
            "https://example.com/cb?state=a&b#frag",
            "a b+c",
            DEFAULT_APP_CLIP_BASE_URL,
        )
        .unwrap();

        assert!(url.contains("&publicKey=a%20b%2Bc&"));
        assert!(url.contains("&redirectUrl=https://example.com/cb?state=a%26b%23frag&"));

        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs[1].1, "a b+c");
        assert_eq!(pairs[2].1, "https://example.com/cb?state=a&b#frag");
    }

    #[test]
    fn options_is_a_reserved_service_name() {
        let mut data = sample_data();
        data.insert(OPTIONS_KEY.into(), true.into());
        let err = payload_json(&data, None).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidService);
        assert!(err.message.contains("reserved"));
    }

    #[test]
    fn encoding_is_deterministic_across_insertion_order() {
        let mut reversed = InputData::new();
        for (k, v) in sample_data().into_iter().rev() {
            reversed.insert(k, v);
        }
        assert_eq!(
            encode_payload(&sample_data(), None).unwrap(),
            encode_payload(&reversed, None).unwrap()
        );
    }
}
