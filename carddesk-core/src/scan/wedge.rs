//! Keyboard-wedge attachment point of the desk.

use thiserror::Error;
use tracing::debug;

use super::keystroke::{KeyEvent, KeystrokeDecoder};

/// Key input arrived while no listener was attached.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("keyboard scanner is detached")]
pub struct WedgeDetached;

/// Owns at most one keystroke decoder.
///
/// Keys reach the desk on its event channel, in the same order as every
/// other message, and are only decoded while the listener is attached.
/// `activate` while attached is a no-op, so a code is never emitted twice.
/// `deactivate` drops the decoder together with any half-typed code.
#[derive(Debug, Default)]
pub struct WedgeListener {
    decoder: Option<KeystrokeDecoder>,
}

impl WedgeListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.decoder.is_some()
    }

    /// Attach. Returns `false` when a listener was already attached.
    pub fn activate(&mut self) -> bool {
        if self.decoder.is_some() {
            debug!("wedge listener already attached");
            return false;
        }
        self.decoder = Some(KeystrokeDecoder::new());
        debug!("wedge listener attached");
        true
    }

    /// Detach. Returns `false` when nothing was attached.
    pub fn deactivate(&mut self) -> bool {
        match self.decoder.take() {
            Some(decoder) => {
                if !decoder.pending().is_empty() {
                    debug!(
                        pending = decoder.pending(),
                        "partial code dropped on detach"
                    );
                }
                debug!("wedge listener detached");
                true
            }
            None => false,
        }
    }

    /// Route one key press; returns a completed code on Enter.
    pub fn feed(
        &mut self,
        key: KeyEvent,
    ) -> Result<Option<String>, WedgeDetached> {
        let decoder = self.decoder.as_mut().ok_or(WedgeDetached)?;
        Ok(decoder.push(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_line(listener: &mut WedgeListener, line: &str) -> Vec<String> {
        KeyEvent::typed(line)
            .filter_map(|key| listener.feed(key).ok().flatten())
            .collect()
    }

    #[test]
    fn repeated_activation_keeps_single_listener() {
        let mut listener = WedgeListener::new();
        assert!(listener.activate());
        assert!(!listener.activate());

        assert_eq!(type_line(&mut listener, "ABC"), vec!["ABC".to_string()]);
    }

    #[test]
    fn detached_listener_refuses_keys() {
        let mut listener = WedgeListener::new();
        assert_eq!(listener.feed(KeyEvent::Char('X')), Err(WedgeDetached));

        listener.activate();
        assert!(listener.deactivate());
        assert!(!listener.deactivate());
        assert!(!listener.is_active());
        assert_eq!(listener.feed(KeyEvent::Enter), Err(WedgeDetached));
    }

    #[test]
    fn reactivation_starts_with_an_empty_buffer() {
        let mut listener = WedgeListener::new();
        listener.activate();
        listener.feed(KeyEvent::Char('9')).unwrap();
        listener.deactivate();

        assert!(listener.activate());
        assert_eq!(type_line(&mut listener, "42"), vec!["42".to_string()]);
    }
}
