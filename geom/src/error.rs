use std::{error, fmt};

/// Returned when a shape can't support the requested operation: too few distinct points, a
/// zero-length tangent, and so on. Callers usually absorb this and degrade to "unknown".
#[derive(Clone, PartialEq)]
pub struct DegenerateGeometry {
    message: String,
}

impl DegenerateGeometry {
    pub fn new<I: Into<String>>(message: I) -> DegenerateGeometry {
        DegenerateGeometry {
            message: message.into(),
        }
    }
}

impl fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "degenerate geometry: {}", self.message)
    }
}

impl fmt::Debug for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Do the same thing as the Display trait
        write!(f, "{}", self)
    }
}

impl error::Error for DegenerateGeometry {}
