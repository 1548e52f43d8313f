//! Errors for this library

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum SimulationError {
    #[snafu(display("Invalid config value for `{field}`: {reason}"))]
    /// A config value that would break one of the simulation's invariants, for example a
    /// particle lifetime of zero, which would make the lifetime interpolations divide by zero.
    InvalidConfig {
        /// The name of the offending config field
        field: String,
        /// Why the value can't be used
        reason: String,
    },
}
