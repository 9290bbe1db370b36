//! Recoverable faults collected during a conversion.
//!
//! A fault that only affects one entity (a pad, a padstack line, a graphics
//! segment) does not stop the conversion. The entity is skipped and a
//! [`Diagnostic`] is appended to the conversion's [`Diagnostics`]. The list
//! keeps encounter order so reports are reproducible.

use std::fmt;

use serde::Serialize;

/// Kind of a recoverable fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCategory {
    /// A pad shape the reader or writer cannot express.
    UnsupportedShape,
    /// A layer the reader or writer cannot express.
    UnsupportedLayer,
    /// A line style without a mapping.
    UnsupportedLineStyle,
    /// No padstack could be bound to a terminal.
    MissingPadstack,
    /// A shape needs an argument the record does not provide.
    MissingArgument,
    /// A record type the reader does not implement.
    UnimplementedPieceType,
    /// A field is missing or is not a valid number.
    MalformedField,
    /// The conversion dropped information on purpose.
    LossyApproximation,
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsupportedShape => "Unsupported shape",
            Self::UnsupportedLayer => "Unsupported layer",
            Self::UnsupportedLineStyle => "Unsupported line style",
            Self::MissingPadstack => "Missing padstack",
            Self::MissingArgument => "Missing argument",
            Self::UnimplementedPieceType => "Unimplemented piece type",
            Self::MalformedField => "Malformed field",
            Self::LossyApproximation => "Lossy approximation",
        };
        f.write_str(name)
    }
}

/// One recorded fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Fault kind.
    pub category: FaultCategory,
    /// Human-readable description naming the offending value.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Append-only, order-preserving collection of diagnostics for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fault.
    pub fn push(&mut self, category: FaultCategory, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%category, "{message}");
        self.entries.push(Diagnostic { category, message });
    }

    /// Records a recoverable error, using its own category and message.
    pub fn record<E: Fault>(&mut self, error: &E) {
        self.push(error.category(), error.to_string());
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded faults.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of recorded faults of one kind.
    #[must_use]
    pub fn count(&self, category: FaultCategory) -> usize {
        self.entries.iter().filter(|d| d.category == category).count()
    }

    /// Recorded faults in encounter order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// An error that can be downgraded to a diagnostic.
pub trait Fault: std::error::Error {
    /// Kind of fault this error represents.
    fn category(&self) -> FaultCategory;
}
