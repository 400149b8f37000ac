use derive_more::{Display, Error};

/// Crate-wide error type.
///
/// Most failure paths in this crate are log-and-continue by design (the
/// device favors availability over strict correctness on malformed input);
/// `Error` surfaces only at the few contract edges where a caller can react.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A scalar did not fit into the destination buffer.
    #[display("payload encode overflow")]
    PayloadOverflow,
    /// A payload was shorter than the scalar expected from it.
    #[display("payload decode truncated")]
    PayloadTruncated,
    /// The captive-portal DNS responder could not be started.
    #[display("dns responder failed to start")]
    DnsResponder,
}

/// Result alias using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
