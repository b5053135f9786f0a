//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block evaluates to `Option<Action>`; `Some` is fed back into the
/// reducer by the runtime.
///
/// # Example
///
/// ```rust,ignore
/// use lexdesk_core::async_effect;
///
/// async_effect! {
///     match services::reference::timezones(&client).await {
///         Ok(items) => Some(ReferenceAction::Fulfilled(kind, items)),
///         Err(e) => Some(ReferenceAction::Rejected(kind, e.message())),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
