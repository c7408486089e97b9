//! Converts MapReduce application names to actual application code.
//!
//! # Example
//!
//! To get the word count application:
//! ```
//! # use anyhow::Result;
//! // This is the correct import to use if you are outside the crate:
//! use mrlocal::workload;
//! // Since you will be working within the `mrlocal` crate,
//! // you should write `use crate::workload;` instead.
//! # fn main() -> Result<()> {
//! let wc = workload::named("wc", &[])?;
//! # Ok(())
//! # }
//! ```

use crate::Workload;
use anyhow::{bail, Result};

pub mod grep;
pub mod wc;

/// Builds the [`Workload`] named `name`, handing it the trailing
/// command-line arguments.
///
/// Returns an [`anyhow::Error`] if no application with the given name
/// was found, or if the application rejects its arguments.
pub fn named(name: &str, args: &[String]) -> Result<Workload> {
    match name {
        "wc" => wc::workload(args),
        "grep" => grep::workload(args),
        _ => bail!("No app named `{}` found.", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn known_names_resolve() {
        assert!(named("wc", &[]).is_ok());
        assert!(named("grep", &args(&["--term", "fox"])).is_ok());
    }

    #[test]
    fn unknown_names_error() {
        assert!(named("sort", &[]).is_err());
    }

    #[test]
    fn grep_requires_a_term() {
        assert!(named("grep", &[]).is_err());
    }
}
