//! CLI Exit Code Registry
//!
//! Single source of truth for exit codes. They are part of the shell
//! contract — scheduled jobs branch on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage error (bad arguments, missing token)     |
//! | 3    | Invalid config (parse or validation failure)   |
//! | 4    | Runtime error (file, database, or API failure) |
//! | 5    | Strict mode: unresolved mismatches in results  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Runtime failure reading inputs, querying the database, or calling
/// the proposal API.
pub const EXIT_RUNTIME: u8 = 4;

/// `--strict` was set and the run produced large differences or
/// not-found companies.
pub const EXIT_STRICT_MISMATCH: u8 = 5;
