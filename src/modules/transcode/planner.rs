//! Turns a requested format and bitrate into a concrete [`EncodingPlan`].

use super::error::TranscodeError;
use super::model::{AudioFormat, EncodingPlan, TranscodeRequest};

pub const DEFAULT_BITRATE_KBPS: u32 = 320;
pub const FALLBACK_BITRATE_KBPS: u32 = 256;
pub const CHANNELS: u8 = 2;
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Duration ceilings (seconds) and the bitrate used up to each ceiling.
const DURATION_TIERS: [(f64, u32); 2] = [(600.0, 320), (1800.0, 256)];
const LONG_FORM_BITRATE_KBPS: u32 = 192;

pub fn parse_format(requested: Option<&str>) -> Result<AudioFormat, TranscodeError> {
    match requested.map(str::trim).filter(|f| !f.is_empty()) {
        Some(raw) => raw.parse(),
        None => Ok(AudioFormat::Mp3),
    }
}

/// An explicit positive bitrate wins, then the duration tier, then the default.
pub fn resolve_bitrate(requested_kbps: Option<i64>, duration_secs: Option<f64>) -> u32 {
    if let Some(kbps) = requested_kbps.filter(|k| *k > 0).and_then(|k| u32::try_from(k).ok()) {
        return kbps;
    }

    match duration_secs.filter(|d| d.is_finite() && *d > 0.0) {
        Some(duration) => DURATION_TIERS
            .iter()
            .find(|(ceiling, _)| duration <= *ceiling)
            .map(|(_, kbps)| *kbps)
            .unwrap_or(LONG_FORM_BITRATE_KBPS),
        None => DEFAULT_BITRATE_KBPS,
    }
}

pub fn plan(format: AudioFormat, bitrate_kbps: u32) -> EncodingPlan {
    EncodingPlan {
        format,
        codec_id: format.codec_id(),
        container_extension: format.container_extension(),
        mime_type: format.mime_type(),
        bitrate_kbps,
        channels: CHANNELS,
        sample_rate_hz: SAMPLE_RATE_HZ,
    }
}

pub fn plan_request(req: &TranscodeRequest) -> Result<EncodingPlan, TranscodeError> {
    let format = parse_format(req.requested_format.as_deref())?;
    let bitrate = resolve_bitrate(req.requested_bitrate_kbps, req.duration_secs);
    Ok(plan(format, bitrate))
}

/// The single fallback attempt: MP3 via LAME at a safe fixed bitrate.
pub fn fallback_plan() -> EncodingPlan {
    plan(AudioFormat::Mp3, FALLBACK_BITRATE_KBPS)
}
