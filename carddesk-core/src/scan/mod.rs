//! Turning raw operator input into card codes.

pub mod camera;
pub mod code;
pub mod feedback;
pub mod keystroke;
pub mod wedge;

pub use camera::{
    CameraEvent, CameraSession, CodeDecoder, CodeStream, LineFeedDecoder,
};
pub use code::{CLIENT_SEPARATOR, ScannedCode};
pub use feedback::{ConfirmationCue, CueError, Silent, TerminalBell};
pub use keystroke::{KeyEvent, KeystrokeDecoder};
pub use wedge::{WedgeDetached, WedgeListener};
