/// Errors reported by the animation selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("animation selector has no materials bound")]
    Underflow,

    #[error("animation selector is already initialized with {0} materials")]
    AlreadyInitialized(usize),
}
