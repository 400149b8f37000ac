//! Logging shims: route to `defmt` on target builds, to the `log` facade on
//! host builds, and compile away entirely when neither feature is enabled.
#![allow(unused_macros, reason = "not every level is used by every build")]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Enable at most one of the 'defmt' and 'log' features");

macro_rules! trace {
    ($($arg:expr),* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::trace!($($arg),*);
            #[cfg(feature = "log")]
            ::log::trace!($($arg),*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($(&$arg),*);
        }
    };
}

macro_rules! debug {
    ($($arg:expr),* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($($arg),*);
            #[cfg(feature = "log")]
            ::log::debug!($($arg),*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($(&$arg),*);
        }
    };
}

macro_rules! info {
    ($($arg:expr),* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::info!($($arg),*);
            #[cfg(feature = "log")]
            ::log::info!($($arg),*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($(&$arg),*);
        }
    };
}

macro_rules! warn {
    ($($arg:expr),* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::warn!($($arg),*);
            #[cfg(feature = "log")]
            ::log::warn!($($arg),*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($(&$arg),*);
        }
    };
}

macro_rules! error {
    ($($arg:expr),* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::error!($($arg),*);
            #[cfg(feature = "log")]
            ::log::error!($($arg),*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($(&$arg),*);
        }
    };
}
