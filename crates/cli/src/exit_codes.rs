//! CLI exit code registry.
//!
//! Single source of truth for every exit code the binary can return.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain      | Description                                  |
//! |---------|-------------|----------------------------------------------|
//! | 0       | Universal   | Success                                      |
//! | 1       | Universal   | General error (unspecified)                  |
//! | 2       | Universal   | CLI usage error (bad args, unknown field)    |
//! | 10-19   | data        | Validation failures, unknown ids, bad files  |
//! | 20-29   | import      | CSV import errors                            |
//! | 30-39   | store       | Row-store / admin service errors             |
//! | 40-49   | config      | Settings file errors                         |
//!
//! When adding a code: pick the range, document what triggers it, and wire
//! it into the relevant command's error handling.

use roilens_io::dataset::DatasetError;
use roilens_recon::ImportError;
use roilens_store::{AdminError, CommandError, StoreError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Data (10-19)
// =============================================================================

/// One or more records failed validation (`validate`, gated saves).
pub const EXIT_INVALID_RECORDS: u8 = 10;

/// The given id names no record in the working copy.
pub const EXIT_UNKNOWN_ENTRY: u8 = 11;

/// Record is in the wrong lifecycle state for the command
/// (trash on trashed, restore/purge on active).
pub const EXIT_LIFECYCLE: u8 = 12;

/// Dataset file missing, unreadable, or malformed.
pub const EXIT_DATASET: u8 = 13;

// =============================================================================
// Import (20-29)
// =============================================================================

/// The CSV parsed but held no data rows.
pub const EXIT_IMPORT_EMPTY: u8 = 20;

/// The file was not readable as CSV at all.
pub const EXIT_IMPORT_PARSE: u8 = 21;

/// `--commit` refused because merged rows carry validation errors.
pub const EXIT_IMPORT_INVALID: u8 = 22;

// =============================================================================
// Store (30-39)
// =============================================================================

/// No saved bearer credential (run `roilens login`).
pub const EXIT_STORE_NOT_AUTH: u8 = 30;

/// Network failure talking to the store or admin service.
pub const EXIT_STORE_NETWORK: u8 = 31;

/// The service answered with a non-success HTTP status.
pub const EXIT_STORE_HTTP: u8 = 32;

/// The service answered, but the body was not decodable.
pub const EXIT_STORE_PARSE: u8 = 33;

// =============================================================================
// Config (40-49)
// =============================================================================

/// Settings file or `--config` override invalid.
pub const EXIT_CONFIG: u8 = 40;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::NotAuthenticated => EXIT_STORE_NOT_AUTH,
        StoreError::Network(_) => EXIT_STORE_NETWORK,
        StoreError::Http(_, _) => EXIT_STORE_HTTP,
        StoreError::Parse(_) => EXIT_STORE_PARSE,
    }
}

/// Map an admin-surface error to its exit code (same range as the store).
pub fn admin_exit_code(err: &AdminError) -> u8 {
    match err {
        AdminError::NotAuthenticated => EXIT_STORE_NOT_AUTH,
        AdminError::Network(_) => EXIT_STORE_NETWORK,
        AdminError::Http(_, _) => EXIT_STORE_HTTP,
        AdminError::Parse(_) => EXIT_STORE_PARSE,
    }
}

/// Map a lifecycle-command error to its exit code.
pub fn command_exit_code(err: &CommandError) -> u8 {
    match err {
        CommandError::UnknownEntry(_) => EXIT_UNKNOWN_ENTRY,
        CommandError::AlreadyTrashed(_) | CommandError::NotTrashed(_) => EXIT_LIFECYCLE,
        CommandError::Store(e) => store_exit_code(e),
    }
}

/// Map an import error to its exit code.
pub fn import_exit_code(err: &ImportError) -> u8 {
    match err {
        ImportError::EmptyTable => EXIT_IMPORT_EMPTY,
        ImportError::Csv(_) => EXIT_IMPORT_PARSE,
    }
}

/// Map a dataset-file error to its exit code.
pub fn dataset_exit_code(_err: &DatasetError) -> u8 {
    EXIT_DATASET
}
