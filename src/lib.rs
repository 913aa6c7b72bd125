// Chess Tournament Registration - Core Library
// Validation, record building and the append-only registration log

pub mod registration;
pub mod validation;
pub mod record;
pub mod log_file;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use registration::{
    ExperienceLevel, TournamentCategory, RegistrationInput, UnknownChoice,
};
pub use validation::{
    validate, Field, ValidationError, MIN_AGE, MAX_AGE,
};
pub use record::{
    record, record_at, RegistrationRecord, FIELD_KEYS, TIMESTAMP_FORMAT,
};
pub use log_file::{
    append_record, format_block, parse_log, read_log,
    LogFileSink, ParseLogError, PersistError, RegistrationSink,
};
pub use export::{export, ExportError, ExportFormat};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of a full Validate → Record → Persist pass
#[derive(Debug)]
pub struct Submission {
    pub record: RegistrationRecord,
    /// Persistence is independent of validation: the registration stands
    /// even when this holds an error
    pub persisted: Result<(), PersistError>,
}

/// Validate, record and persist one registration.
///
/// Fails only on validation; a persistence failure is reported inside the
/// returned [`Submission`].
pub fn submit(
    input: &RegistrationInput,
    sink: &mut dyn RegistrationSink,
) -> Result<Submission, ValidationError> {
    let record = record(input)?;
    let persisted = sink.append(&record);
    if let Err(err) = &persisted {
        log::warn!("registration accepted but not saved: {}", err);
    }
    Ok(Submission { record, persisted })
}
