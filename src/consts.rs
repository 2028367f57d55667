//! Shared constants: security parameters and defaults

/// The only cipher identifier this crate produces or accepts
pub const CIPHER_ID: &str = "aes-256-cbc";

/// 256-bit AES key
pub const KEY_LENGTH: usize = 32;

/// Hex form of a key: two characters per byte
pub const KEY_HEX_LENGTH: usize = KEY_LENGTH * 2;

/// AES block size == CBC IV length
pub const IV_LENGTH: usize = 16;

/// HMAC-SHA256 output length
pub const TAG_LENGTH: usize = 32;

/// Separator between MAC input fields; never part of base64 output
pub const MAC_FIELD_SEPARATOR: &str = ".";

/// Unix permission bits for every key, credentials, backup and temp file we create
pub const OWNER_ONLY_MODE: u32 = 0o600;

/// Suffix stripped from key file names when deriving the environment variable name
pub const KEY_FILE_EXTENSION: &str = ".key";

/// Suffix appended to derived environment variable names
pub const KEY_ENV_SUFFIX: &str = "_KEY";

/// Default `<PREFIX>` of derived key variables
pub const DEFAULT_ENV_PREFIX: &str = "SECRETS";

/// Key file name that additionally honours [`DEFAULT_MASTER_KEY_FALLBACK_VAR`]
pub const MASTER_KEY_FILE_NAME: &str = "master.key";

/// Compatibility variable for Rails-style master keys
pub const DEFAULT_MASTER_KEY_FALLBACK_VAR: &str = "RAILS_MASTER_KEY";

/// Suffix of the key file saved by a rotation that could neither commit nor roll back
pub const EMERGENCY_KEY_SUFFIX: &str = ".emergency-recovery";

/// Marker in the name of rotation backups
pub const BACKUP_MARKER: &str = ".rotate-backup-";

/// Prefix of every temporary file we create
pub const TEMP_FILE_PREFIX: &str = ".credentials-tmp-";

/// Editor used when neither config nor `$EDITOR` names one
pub const DEFAULT_EDITOR: &str = "vi";
