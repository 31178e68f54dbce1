use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use strum_macros::{Display, EnumIter};
use tracing::{debug, warn};

use crate::billing::Parties;

#[derive(Display, EnumIter, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Format {
    #[strum(serialize = "HTML")]
    Html,
    #[strum(serialize = "PDF")]
    Pdf,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Pdf => "pdf",
        }
    }
}

/// The kind of document being written, which decides its file name.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Target {
    Stay(Format),
    Simple,
    Tour,
}

impl Target {
    pub fn filename(&self, parties: &Parties) -> String {
        match self {
            Target::Stay(format) => format!(
                "Proforma_Invoice_{}_{}.{}",
                sanitize(&parties.agency),
                sanitize(&parties.customer),
                format.extension()
            ),
            Target::Simple => {
                format!("proforma_invoice_{}.pdf", sanitize(&parties.customer))
            }
            Target::Tour => {
                format!("tour_invoice_{}.pdf", sanitize(&parties.customer))
            }
        }
    }
}

/// Keep only the alphanumeric characters of a name so it is safe to use in
/// a file name.
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Write a rendered invoice into `dir`, replacing any previous file of the
/// same name.
pub fn save(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(filename);
    if path.exists() {
        warn!("{} already exists and will be overwritten", path.display());
    }

    let mut file = File::create(&path)?;
    file.write_all(bytes)?;
    debug!(bytes = bytes.len(), "wrote {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parties(agency: &str, customer: &str) -> Parties {
        Parties {
            customer: customer.to_string(),
            agency: agency.to_string(),
            agent: "Luis".to_string(),
        }
    }

    #[test]
    fn sanitized_names() {
        assert_eq!(sanitize("Eco Tours!"), "EcoTours");
        assert_eq!(sanitize("A. B."), "AB");
        assert_eq!(sanitize("María\tJosé"), "MaríaJosé");
        assert_eq!(sanitize("../../etc"), "etc");
    }

    #[test]
    fn filenames() {
        let parties = parties("Eco Tours!", "A. B.");

        assert_eq!(
            Target::Stay(Format::Html).filename(&parties),
            "Proforma_Invoice_EcoTours_AB.html"
        );
        assert_eq!(
            Target::Stay(Format::Pdf).filename(&parties),
            "Proforma_Invoice_EcoTours_AB.pdf"
        );
        assert_eq!(Target::Simple.filename(&parties), "proforma_invoice_AB.pdf");
        assert_eq!(Target::Tour.filename(&parties), "tour_invoice_AB.pdf");
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let first = save(dir.path(), "invoice.html", b"first").unwrap();
        let second = save(dir.path(), "invoice.html", b"second").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }

    #[test]
    fn save_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(save(&missing, "invoice.pdf", b"%PDF").is_err());
    }
}
