//! Internal status reporting for consumer tasks.
//!
//! The hot path never logs about itself. Consumer pumps do need to report
//! rare conditions (reader fell behind, transport up/down), and where that
//! report goes depends on the platform: the `log` facade on hosts, `defmt`
//! on embedded targets, nowhere when neither is available.
//!
//! `status_log!` selects the backend from the active features so the pump
//! code reads the same everywhere:
//!
//! ```rust,ignore
//! status_log!(warn, "log transport down");
//! status_log!(error, "log consumer fell behind");
//! ```

/// Status reporting macro - routes to `log::` or `defmt::` based on features
#[macro_export]
#[cfg(feature = "log")]
macro_rules! status_log {
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(not(feature = "log"), feature = "defmt"))]
macro_rules! status_log {
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(not(feature = "log"), not(feature = "defmt")))]
macro_rules! status_log {
    ($level:ident, $($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}
