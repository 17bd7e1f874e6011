//! Diagnostic codes with subsystem prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subsystem a diagnostic originates from, determining its prefix letter.
///
/// Each category maps to a single-character prefix used in diagnostic code
/// display (e.g., `N101` for a netlist diagnostic, `C010` for clock sync).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Netlist structure diagnostics, prefixed with `N`.
    Netlist,
    /// Peephole-optimization diagnostics, prefixed with `O`.
    Optimize,
    /// Timing-analysis diagnostics, prefixed with `T`.
    Timing,
    /// Clock-synchronization diagnostics, prefixed with `C`.
    Clock,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Netlist => 'N',
            Category::Optimize => 'O',
            Category::Timing => 'T',
            Category::Clock => 'C',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric id.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `N101`, `O203`, `C010`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The subsystem of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
