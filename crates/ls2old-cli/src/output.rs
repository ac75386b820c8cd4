//! Terminal output for the migration run.

use colored::Colorize;

/// Prints run progress and reports, optionally colored.
pub struct Printer {
    color_enabled: bool,
}

impl Printer {
    /// Create a new printer.
    pub fn new(color_enabled: bool) -> Printer {
        Printer { color_enabled }
    }

    /// A step heading.
    pub fn section(&self, text: &str) {
        if self.color_enabled {
            println!("\n{}", text.bold().green());
        } else {
            println!("\n{}", text);
        }
    }

    /// A plain progress line.
    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    /// A multi-line report, printed verbatim.
    pub fn report(&self, text: &str) {
        println!("{}", text);
    }

    /// A caution the operator should read.
    pub fn caution(&self, text: &str) {
        if self.color_enabled {
            println!("{}", text.yellow());
        } else {
            println!("{}", text);
        }
    }
}
