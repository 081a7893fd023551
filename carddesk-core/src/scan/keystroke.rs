/// One key press as delivered by a keyboard-wedge scanner or a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Char(char),
    Enter,
}

impl KeyEvent {
    /// Keystrokes a wedge scanner produces for `line`: every character
    /// followed by the terminating Enter.
    pub fn typed(line: &str) -> impl Iterator<Item = KeyEvent> + '_ {
        line.chars()
            .map(KeyEvent::Char)
            .chain(std::iter::once(KeyEvent::Enter))
    }
}

/// Reassembles wedge keystrokes into complete codes.
///
/// Characters accumulate until Enter. Enter emits the trimmed buffer when it
/// holds anything besides whitespace, and always starts a fresh buffer.
/// Scanner input and fast human typing are indistinguishable here; only the
/// terminator convention separates codes.
#[derive(Debug, Default, Clone)]
pub struct KeystrokeDecoder {
    buffer: String,
}

impl KeystrokeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key; returns a completed code on Enter.
    pub fn push(&mut self, key: KeyEvent) -> Option<String> {
        match key {
            KeyEvent::Char(c) => {
                self.buffer.push(c);
                None
            }
            KeyEvent::Enter => {
                let code = self.buffer.trim().to_string();
                self.buffer.clear();
                (!code.is_empty()).then_some(code)
            }
        }
    }

    /// Characters received since the last Enter.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut KeystrokeDecoder, keys: &[KeyEvent]) -> Vec<String> {
        keys.iter().filter_map(|k| decoder.push(*k)).collect()
    }

    #[test]
    fn enter_completes_one_code() {
        let mut decoder = KeystrokeDecoder::new();
        let codes = feed(
            &mut decoder,
            &[
                KeyEvent::Char('A'),
                KeyEvent::Char('B'),
                KeyEvent::Char('C'),
                KeyEvent::Enter,
            ],
        );
        assert_eq!(codes, vec!["ABC".to_string()]);
        assert_eq!(decoder.pending(), "");
    }

    #[test]
    fn enter_on_empty_buffer_emits_nothing() {
        let mut decoder = KeystrokeDecoder::new();
        assert_eq!(decoder.push(KeyEvent::Enter), None);
    }

    #[test]
    fn whitespace_only_buffer_emits_nothing() {
        let mut decoder = KeystrokeDecoder::new();
        let codes: Vec<_> =
            KeyEvent::typed("   ").filter_map(|k| decoder.push(k)).collect();
        assert!(codes.is_empty());
        assert_eq!(decoder.pending(), "");
    }

    #[test]
    fn emitted_code_is_trimmed() {
        let mut decoder = KeystrokeDecoder::new();
        let codes: Vec<_> = KeyEvent::typed(" 4000-1234 \t")
            .filter_map(|k| decoder.push(k))
            .collect();
        assert_eq!(codes, vec!["4000-1234".to_string()]);
    }

    #[test]
    fn consecutive_scans_are_separate_codes() {
        let mut decoder = KeystrokeDecoder::new();
        let codes: Vec<_> = KeyEvent::typed("111")
            .chain(KeyEvent::typed("222"))
            .filter_map(|k| decoder.push(k))
            .collect();
        assert_eq!(codes, vec!["111".to_string(), "222".to_string()]);
    }
}
