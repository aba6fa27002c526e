//! Domain-level constants.

// =============================================================================
// Account Roles
// =============================================================================

/// Stored code of the role assigned to new accounts
pub const ROLE_CODE_DEFAULT: i32 = 0;

/// Stored code of the HR role
pub const ROLE_CODE_HR: i32 = 1;

/// Stored code of the interviewer role
pub const ROLE_CODE_INTERVIEWER: i32 = 2;

/// Stored code of the moderator role
pub const ROLE_CODE_MODERATOR: i32 = 3;

// =============================================================================
// Activation
// =============================================================================

/// Activation state of a freshly created account.
///
/// Accounts stay disabled until a separate activation step flips the flag.
pub const DEFAULT_IS_ACTIVE: bool = false;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;
