use std::borrow::Cow;

/// Boxed codec failure carried by [`StoreError::Serialization`].
pub type CodecFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A specialized [`Result`](std::result::Result) for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Every failure the collection store can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Serialization failure{}: {source}", format_context(.context))]
    Serialization { source: CodecFailure, context: Option<Cow<'static, str>> },
}

impl StoreError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument { message: message.into(), context: None }
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub(crate) fn codec(source: impl Into<CodecFailure>) -> Self {
        Self::Serialization { source: source.into(), context: None }
    }

    pub(crate) fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        *self.context_slot() = Some(context.into());
        self
    }

    fn context_slot(&mut self) -> &mut Option<Cow<'static, str>> {
        match self {
            Self::InvalidArgument { context, .. }
            | Self::NotFound { context, .. }
            | Self::Io { context, .. }
            | Self::Serialization { context, .. } => context,
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    ///
    /// Lock-free reads can race a concurrent delete; callers typically retry or
    /// treat the record as gone when this returns `true`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the attached context, if any.
    #[must_use]
    pub fn context_str(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { context, .. }
            | Self::NotFound { context, .. }
            | Self::Io { context, .. }
            | Self::Serialization { context, .. } => context.as_deref(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[inline]
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

/// Adds `.context(...)` to store results and to raw I/O results.
pub trait StoreErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> StoreErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> StoreErrorExt<T> for std::result::Result<T, std::io::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| StoreError::Io { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
