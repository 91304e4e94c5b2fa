use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module implements this trait to register its endpoints.
/// The binary collects all modules and merges their routes into a single
/// Router. Routes are absolute (`/api/menu`, `/blob/...`).
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes.
    fn routes(&self) -> Router;
}
