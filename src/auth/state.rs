//! Authentication state trait and macro.

use super::engine::AuthEngine;

/// Trait for state types that give handlers access to the auth engine.
pub trait HasAuthEngine {
    fn engine(&self) -> &AuthEngine;
}

/// Macro to implement `HasAuthEngine` for state structs with the standard field.
///
/// The struct must have an `engine: Arc<AuthEngine>` field.
///
/// # Example
/// ```ignore
/// use crate::impl_has_auth_engine;
///
/// #[derive(Clone)]
/// pub struct MyState {
///     pub engine: Arc<AuthEngine>,
/// }
///
/// impl_has_auth_engine!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_engine {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthEngine for $state_type {
            fn engine(&self) -> &$crate::auth::AuthEngine {
                &self.engine
            }
        }
    };
}
