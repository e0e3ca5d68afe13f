//! Application-wide constants
//!
//! This module contains the document keys and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Field keys consulted on individual records
pub mod fields {
    /// Unique device identifier on a paired device
    pub const MT_UID: &str = "mtUid";

    /// Human-readable device name
    pub const NAME: &str = "name";

    /// Link reference used for in-ear monitor (input) routing
    pub const IEM_AUDIOLINK_ID: &str = "iemAudiolinkId";

    /// Link reference used for microphone (output) routing
    pub const MIC_AUDIOLINK_ID: &str = "micAudiolinkId";

    /// Key of a routing link
    pub const AUDIOLINK_ID: &str = "audiolinkId";

    /// Key of an audio input
    pub const INPUT_ID: &str = "inputId";

    /// Key of an audio output
    pub const OUTPUT_ID: &str = "outputId";
}

/// Display fallbacks for incomplete device entries
pub mod display {
    /// Shown when a device has no name
    pub const UNNAMED_DEVICE: &str = "Unnamed";

    /// Shown when a device has no UID
    pub const UNKNOWN_UID: &str = "Unknown";

    /// Shown for an absent key value in logs and summaries
    pub const ABSENT_KEY: &str = "<none>";
}

/// Output file naming
pub mod output {
    /// Default prefix for generated setup files
    pub const FILE_PREFIX: &str = "Spectera_Setup";

    /// Extension for generated setup files
    pub const FILE_EXTENSION: &str = "json";

    /// chrono format string for the timestamp part of the file name
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
}

/// Configuration file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "spectera-transfer";

    /// Settings file name
    pub const FILENAME: &str = "config.json";

    /// Environment variable overriding the configured log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}

/// User-facing messages shared between the CLI and logs
pub mod messages {
    /// Pairing workflow shown when the target file has no paired devices
    pub const NO_TARGET_DEVICES_WORKFLOW: &str = "The target file has no paired devices.\n\n\
        Workflow:\n\
        1. Pair your devices to the destination base station\n\
        2. Save that configuration file (this becomes your target file)\n\
        3. Use this tool to transfer settings from the original base station\n\
        4. Load the output file into the destination base station";
}
