//! Application-wide constants.
//!
//! This module defines the application name and the defaults for the Teensy
//! keyboard project layout the tool was built around.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "MatrixSync";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "matrixsync";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "MATRIXSYNC_CONFIG_DIR";

/// Firmware sketch rewritten by the patcher.
pub const DEFAULT_SKETCH: &str = "script3revolt/script3revolt.ino";

/// Key list the decoder run produces and the generator reads.
pub const DEFAULT_KEYBOARD_FILE: &str = "Keyboard_without_number_pad.txt";

/// Answers the generator expects on stdin: layout 1, 4 layers, no extras.
pub const DEFAULT_GENERATOR_ANSWERS: [&str; 3] = ["1", "4", "n"];

/// Board identifier passed to `arduino-cli --fqbn`.
pub const DEFAULT_FQBN: &str = "teensy:avr:teensy41:usb=hid";

/// Upload port of the Teensy.
pub const DEFAULT_PORT: &str = "usb3/3-7";

/// How long the operator gets to review the key list, in seconds.
pub const DEFAULT_REVIEW_TIMEOUT_SECS: u64 = 60;
