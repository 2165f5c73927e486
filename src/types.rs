/// What a [`FlagSet`](crate::FlagSet) does when parsing fails.
///
/// Every policy first writes the failure to the set's output: help requests
/// print the usage text, other errors print the message followed by usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Call the exit hook with status 2 (0 for help), then return the error
    /// if the hook returns.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}
