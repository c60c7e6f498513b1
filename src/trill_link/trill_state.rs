use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, PartialEq, Eq, strum_macros::Display)]
pub enum TrillDecodeError {
    NotUtf8,
}

/// Decodes a datagram: trimmed text `"1"` is an active trill, any other text is not.
pub fn decode_payload(payload: &[u8]) -> Result<bool, TrillDecodeError> {
    let text = std::str::from_utf8(payload).map_err(|_| TrillDecodeError::NotUtf8)?;
    Ok(text.trim() == "1")
}

/// Latest trill value, written by the receiver task and read by the frame loop.
///
/// Last writer wins; intermediate values may be overwritten before anyone reads them.
#[derive(Debug, Default)]
pub struct TrillState(AtomicBool);

impl TrillState {
    pub fn new() -> Self { Self(AtomicBool::new(false)) }

    pub fn is_active(&self) -> bool { self.0.load(Ordering::Acquire) }

    pub fn set(&self, active: bool) { self.0.store(active, Ordering::Release); }

    /// Applies a raw datagram. A payload that fails to decode leaves the state untouched.
    pub fn apply_payload(&self, payload: &[u8]) -> Result<bool, TrillDecodeError> {
        let active = decode_payload(payload)?;
        self.set(active);
        Ok(active)
    }
}
