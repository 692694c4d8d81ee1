//! sqmc error codes following a structured numbering system
//!
//! Error code ranges:
//! - SQM0001-SQM0099: Internal consistency failures (assertions)
//! - SQM0100-SQM0199: Query definition errors (attributable to the query)
//! - SQM0200-SQM0299: Declared but not yet implemented constructs
//! - SQM0300-SQM0399: Mapping errors (metamodel lookups, invalid mappings)
//! - SQM0400-SQM0499: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is an internal consistency failure (0001-0099)
    pub const fn is_assertion(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a query definition error (0100-0199)
    pub const fn is_query_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this marks an unimplemented construct (0200-0299)
    pub const fn is_not_yet_implemented(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a mapping error (0300-0399)
    pub const fn is_mapping_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQM{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Internal consistency (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected statement kind")
        .with_help("Only select statements can be translated into a select query"));
    map.insert(2, ErrorInfo::new("From-clause scope mismatch"));
    map.insert(3, ErrorInfo::new("Join column count mismatch"));
    map.insert(4, ErrorInfo::new("Unresolved from-element"));
    map.insert(5, ErrorInfo::new("Unexpected node"));

    // Query definition (0100-0199)
    map.insert(100, ErrorInfo::new("Unresolved parameter type")
        .with_help("Bind the parameter with an explicit type or give it an anticipated type"));
    map.insert(101, ErrorInfo::new("Literal rendering failed"));

    // Not yet implemented (0200-0299)
    map.insert(200, ErrorInfo::new("Entity joins are not yet implemented"));
    map.insert(201, ErrorInfo::new("Filter predicates are not yet implemented"));

    // Mapping (0300-0399)
    map.insert(300, ErrorInfo::new("Unknown entity"));
    map.insert(301, ErrorInfo::new("Unknown attribute"));
    map.insert(302, ErrorInfo::new("Unknown collection role"));
    map.insert(303, ErrorInfo::new("Invalid mapping"));

    // System (0400-0499)
    map.insert(400, ErrorInfo::new("I/O error"));
    map.insert(401, ErrorInfo::new("Configuration error"));

    map
});

// Internal consistency
pub const SQM0001: ErrorCode = ErrorCode::new(1);
pub const SQM0002: ErrorCode = ErrorCode::new(2);
pub const SQM0003: ErrorCode = ErrorCode::new(3);
pub const SQM0004: ErrorCode = ErrorCode::new(4);
pub const SQM0005: ErrorCode = ErrorCode::new(5);

// Query definition
pub const SQM0100: ErrorCode = ErrorCode::new(100);
pub const SQM0101: ErrorCode = ErrorCode::new(101);

// Not yet implemented
pub const SQM0200: ErrorCode = ErrorCode::new(200);
pub const SQM0201: ErrorCode = ErrorCode::new(201);

// Mapping
pub const SQM0300: ErrorCode = ErrorCode::new(300);
pub const SQM0301: ErrorCode = ErrorCode::new(301);
pub const SQM0302: ErrorCode = ErrorCode::new(302);
pub const SQM0303: ErrorCode = ErrorCode::new(303);

// System
pub const SQM0400: ErrorCode = ErrorCode::new(400);
pub const SQM0401: ErrorCode = ErrorCode::new(401);
