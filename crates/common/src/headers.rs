//! Identity headers forwarded by the edge gateway after it has verified a
//! bearer token. Services trust these and do no token checks of their own.

/// Numeric id of the authenticated user.
pub const USER_ID: &str = "x-user-id";

/// Username claim of the authenticated user.
pub const USERNAME: &str = "x-username";
