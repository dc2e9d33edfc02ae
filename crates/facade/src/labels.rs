//! Standard labels.
//!
//! Labels categorize records into broad concerns, and double as the unit
//! of debug filtering (`onlyLogDebugIfContainsLabel`).

/// Debugging-level API call details.
pub const API_CALL: &str = "clabel_api_call";
/// Records that should raise an alarm.
pub const ALARM_ON_THIS: &str = "clabel_alarm_on_this";
/// End-of-run resource cleanup.
pub const CLEANUP: &str = "clabel_cleanup";
/// Runtime configuration of the process.
pub const CONFIGURATION: &str = "clabel_configuration";
/// State of the process at its conclusion.
pub const END_OF_RUN: &str = "clabel_end_of_run";
/// Errors to review when asking what failed in a run.
pub const FAILURE_ORIGIN: &str = "clabel_failure_origin";
/// Per-item details.
pub const INDIVIDUAL_ITEM_DETAILS: &str = "clabel_individual_item_details";
/// Progress of long running work.
pub const PROGRESS_TICKER: &str = "clabel_progress_ticker";
/// State of the process when a run starts.
pub const START_OF_RUN: &str = "clabel_start_of_run";
/// A warning, expressed as a label rather than a level.
pub const WARNING: &str = "clabel_warning";

/// Every standard label.
pub const ALL: [&str; 10] = [
    API_CALL,
    ALARM_ON_THIS,
    CLEANUP,
    CONFIGURATION,
    END_OF_RUN,
    FAILURE_ORIGIN,
    INDIVIDUAL_ITEM_DETAILS,
    PROGRESS_TICKER,
    START_OF_RUN,
    WARNING,
];
