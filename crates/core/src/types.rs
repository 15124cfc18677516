/// Projects are keyed by UUID v4.
pub type ProjectId = uuid::Uuid;

/// Shots, scenes, characters, and variations carry opaque string ids
/// assigned by the script-parsing collaborator.
pub type EntityId = String;

/// A conditioning or result image handle (URL or data URI).
pub type ImageRef = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
