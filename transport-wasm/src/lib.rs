//! Framework-neutral WASM <-> JavaScript bridge.

use chrono::NaiveTime;
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use transport_core::{SystemClock, TransportConfig, TransportError};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsTransportConfig {
    #[serde(default)]
    tariff_per_km: Option<f64>,
    #[serde(default)]
    earth_radius_km: Option<f64>,
    #[serde(default)]
    default_pickup_time: Option<NaiveTime>,
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
}

impl From<JsTransportConfig> for TransportConfig {
    fn from(cfg: JsTransportConfig) -> Self {
        let mut base = TransportConfig::default();
        if let Some(rate) = cfg.tariff_per_km {
            base.tariff_per_km = rate;
        }
        if let Some(radius) = cfg.earth_radius_km {
            base.earth_radius_km = radius;
        }
        if let Some(time) = cfg.default_pickup_time {
            base.default_pickup_time = time;
        }
        if let Some(minutes) = cfg.utc_offset_minutes {
            base.utc_offset_minutes = minutes;
        }
        base
    }
}

/// Value every booking and total the portfolio.
#[wasm_bindgen]
pub fn summarize_portfolio(
    bookings: JsValue,
    hospitals: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bookings = from_value::<serde_json::Value>(bookings)
        .map_err(|err| JsValue::from_str(&format!("could not read bookings: {err}")))?;
    let hospitals = from_value::<serde_json::Value>(hospitals)
        .map_err(|err| JsValue::from_str(&format!("could not read hospitals: {err}")))?;
    let cfg = read_config(config)?;

    let summary =
        transport_records::summarize_portfolio_value(&bookings, &hospitals, &cfg, &SystemClock)
            .map_err(|err| JsValue::from_str(&format_transport_error(err)))?;

    to_value(&summary).map_err(|err| JsValue::from_str(&format!("could not serialize summary: {err}")))
}

/// Translate upstream booking rows into internal bookings.
#[wasm_bindgen]
pub fn translate_bookings(bookings: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bookings = from_value::<serde_json::Value>(bookings)
        .map_err(|err| JsValue::from_str(&format!("could not read bookings: {err}")))?;
    let cfg = read_config(config)?;

    let translated = transport_records::translate_bookings_value(&bookings, &cfg, &SystemClock)
        .map_err(|err| JsValue::from_str(&format_transport_error(err)))?;

    to_value(&translated)
        .map_err(|err| JsValue::from_str(&format!("could not serialize bookings: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<TransportConfig, JsValue> {
    match config {
        Some(js_cfg) => {
            let cfg: JsTransportConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read config: {err}")))?;
            Ok(TransportConfig::from(cfg))
        }
        None => Ok(TransportConfig::default()),
    }
}

fn format_transport_error(err: TransportError) -> String {
    format!("Transport error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_js_config_overrides_defaults() {
        let js: JsTransportConfig =
            serde_json::from_str(r#"{"tariff_per_km": 850.0, "default_pickup_time": "09:00:00"}"#)
                .expect("config should parse");
        let cfg = TransportConfig::from(js);
        assert_eq!(cfg.tariff_per_km, 850.0);
        assert_eq!(cfg.earth_radius_km, 6371.0);
        assert_eq!(cfg.default_pickup_time.to_string(), "09:00:00");
        assert_eq!(cfg.utc_offset_minutes, 0);
    }
}
