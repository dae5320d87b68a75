//! Centralised logging metadata (event names, shared keys, etc.).

/// Canonical event names used across the service.
pub mod events {
    /// HTTP request lifecycle.
    pub const REQUEST_START: &str = "request.start";
    pub const REQUEST_COMPLETE: &str = "request.complete";
    pub const REQUEST_ERROR: &str = "request.error";
    pub const REQUEST_SLOW: &str = "request.slow";

    /// Server lifecycle.
    pub const SERVER_STARTING: &str = "server.starting";
    pub const SERVER_LISTENING: &str = "server.listening";
    pub const SERVER_SHUTDOWN: &str = "server.shutdown";

    /// Message extraction.
    pub const EXTRACT_COMPLETE: &str = "extract.complete";
    pub const DUPLICATE_FOUND: &str = "extract.duplicate_found";

    /// Property store.
    pub const STORE_CONNECTED: &str = "store.connected";
    pub const STORE_UNAVAILABLE: &str = "store.unavailable";
    pub const PROPERTY_CREATED: &str = "property.created";
    pub const PROPERTY_UPDATED: &str = "property.updated";
    pub const PROPERTY_DELETED: &str = "property.deleted";

    /// Image storage.
    pub const IMAGE_SAVED: &str = "image.saved";
    pub const IMAGE_THUMBNAIL_FAILED: &str = "image.thumbnail_failed";
    pub const IMAGE_REJECTED: &str = "image.rejected";
    pub const IMAGE_DELETED: &str = "image.deleted";
    pub const IMAGE_DELETE_FAILED: &str = "image.delete_failed";
}
