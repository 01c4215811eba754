//! Wire encoding of message bodies.
//!
//! A body is `"{ttr};{payload}"`: the producer's time-to-run in whole seconds,
//! a literal `;`, then the opaque job payload. The payload is not escaped, so
//! decoding splits only at the first separator and keeps any further `;`
//! characters as part of the payload.

use crate::error::FormatError;

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

/// Separator between the time-to-run prefix and the payload
pub const SEPARATOR: char = ';';

/// A message body split into its time-to-run and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedJob {
    pub ttr_seconds: u32,
    pub payload: String,
}

/// Encode a job payload together with its time-to-run
pub fn encode(ttr_seconds: u32, payload: &str) -> String {
    format!("{}{}{}", ttr_seconds, SEPARATOR, payload)
}

/// Decode a message body produced by [`encode`]
pub fn decode(body: &str) -> Result<DecodedJob, FormatError> {
    let (ttr, payload) = body
        .split_once(SEPARATOR)
        .ok_or(FormatError::MissingSeparator)?;

    // `u32::from_str` accepts a leading '+', which is not part of the wire format
    if ttr.is_empty() || !ttr.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidTtr {
            value: ttr.to_string(),
        });
    }

    let ttr_seconds = ttr.parse::<u32>().map_err(|_| FormatError::InvalidTtr {
        value: ttr.to_string(),
    })?;

    Ok(DecodedJob {
        ttr_seconds,
        payload: payload.to_string(),
    })
}
