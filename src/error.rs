use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InvoiceError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },

    #[error("Invalid {field}: '{input}', expected {expected}")]
    Parse {
        field: &'static str,
        input: String,
        expected: &'static str,
    },

    #[error("{field} {rule}")]
    Range {
        field: &'static str,
        rule: &'static str,
    },

    #[error("Invalid choice: '{input}', expected a number from 1 to {options}")]
    Selection { input: String, options: usize },
}

impl InvoiceError {
    pub(crate) fn parse(
        field: &'static str,
        input: &str,
        expected: &'static str,
    ) -> Self {
        Self::Parse {
            field,
            input: input.to_string(),
            expected,
        }
    }

    pub(crate) fn range(field: &'static str, rule: &'static str) -> Self {
        Self::Range { field, rule }
    }
}

/// Problems with optional artwork. These never stop an invoice from being
/// written, the artwork is left out instead.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("not a JPEG image")]
    NotJpeg,

    #[error("JPEG is truncated before its frame header")]
    Truncated,

    #[error("JPEG with {0} color components is not supported")]
    Components(u8),
}
