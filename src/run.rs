use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use crate::billing::{choose, StayInvoice, TourInvoice};
use crate::cli::{Command, Opts};
use crate::error::{AssetError, InvoiceError};
use crate::input;
use crate::layout::{Layout, Letterhead, ECO_RESERVE, HOTEL, RESERVE};
use crate::output::{self, Format, Target};
use crate::pdf::{Logo, PdfInvoice, Style};
use crate::templates;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

const HTML_LOGO: &str = "logo.png";
const PDF_LOGO: &str = "logo.jpg";

const PROFORMA_TITLE: &str = "PROFORMA INVOICE";
const TOUR_TITLE: &str = "TOUR INVOICE";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{source}")]
    Invoice {
        #[from]
        source: InvoiceError,
    },

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Input Error: {source}")]
    Input {
        #[from]
        source: inquire::error::InquireError,
    },

    #[error("Error rendering HTML: {source}")]
    Template {
        #[from]
        source: askama::Error,
    },

    #[error("Error rendering PDF: {source}")]
    Pdf {
        #[from]
        source: lopdf::Error,
    },
}

/// Where invoices are written and the logo they carry.
pub struct Assets {
    output_dir: PathBuf,
    logo: Option<PathBuf>,
}

impl Assets {
    pub fn new(output_dir: PathBuf, logo: Option<PathBuf>) -> Self {
        Self { output_dir, logo }
    }

    // Default logos live next to the invoices they decorate.
    fn logo_path(&self, default: &str) -> PathBuf {
        self.logo
            .clone()
            .unwrap_or_else(|| self.output_dir.join(default))
    }

    /// The `src` of the page's logo. The page is written to the output
    /// directory, so the default logo is linked by its bare name and a
    /// `--logo` file by its absolute path.
    fn html_logo(&self) -> Option<String> {
        let path = self.logo_path(HTML_LOGO);
        let src = match &self.logo {
            _ if !path.is_file() => None,
            None => Some(HTML_LOGO.to_string()),
            Some(_) => fs::canonicalize(&path)
                .ok()
                .map(|absolute| absolute.display().to_string()),
        };
        if src.is_none() {
            warn!(
                "Logo file not found at: {}. Proceeding without the logo.",
                path.display()
            );
        }
        src
    }

    fn pdf_logo(&self) -> Option<Logo> {
        let path = self.logo_path(PDF_LOGO);
        match Logo::load(&path) {
            Ok(logo) => {
                let (width, height) = logo.dimensions();
                debug!(width, height, "embedding logo {}", path.display());
                Some(logo)
            }
            Err(AssetError::Io { source }) if source.kind() == ErrorKind::NotFound => {
                warn!(
                    "Logo file not found at: {}. Proceeding without the logo.",
                    path.display()
                );
                None
            }
            Err(error) => {
                warn!(
                    "Error loading logo {}: {}. Proceeding without the logo.",
                    path.display(),
                    error
                );
                None
            }
        }
    }

    fn pdf(
        &self,
        invoice: &impl Layout,
        title: &str,
        style: Style,
        issued: NaiveDate,
        letterhead: &Letterhead,
    ) -> Result<Vec<u8>, RunError> {
        let document = PdfInvoice {
            title,
            issued,
            letterhead,
            sections: invoice.sections(),
            style,
            logo: self.pdf_logo(),
        };
        Ok(document.to_bytes()?)
    }
}

pub fn run_cmd(opts: Opts) -> Result<(), RunError> {
    let assets = Assets::new(opts.output_dir, opts.logo);
    let issued = Local::now().date_naive();

    match opts.subcommand {
        Command::Stay => {
            let invoice = input::stay(true)?.validate()?;
            println!("\n{}", invoice.total());
            let format = choose::<Format>(&input::format()?)?;
            let path = write_stay(&invoice, format, &assets, issued)?;
            println!("Proforma invoice saved as {}", path.display());
        }
        Command::Simple => {
            let invoice = input::stay(false)?.validate()?;
            let path = write_simple(&invoice, &assets, issued)?;
            println!("Proforma invoice saved as {}", path.display());
        }
        Command::Tour => {
            let invoice = input::tour()?.validate()?;
            let path = write_tour(&invoice, &assets, issued)?;
            println!("Tour invoice generated successfully: {}", path.display());
        }
    }
    Ok(())
}

fn write_stay(
    invoice: &StayInvoice,
    format: Format,
    assets: &Assets,
    issued: NaiveDate,
) -> Result<PathBuf, RunError> {
    info!(%format, nights = invoice.nights(), "rendering stay proforma");
    let bytes = match format {
        Format::Html => {
            let logo = assets.html_logo();
            templates::proforma_html(invoice, issued, logo.as_deref())?
                .into_bytes()
        }
        Format::Pdf => assets.pdf(
            invoice,
            PROFORMA_TITLE,
            Style::Paragraphs,
            issued,
            &RESERVE,
        )?,
    };
    let filename = Target::Stay(format).filename(invoice.parties());
    Ok(output::save(&assets.output_dir, &filename, &bytes)?)
}

fn write_simple(
    invoice: &StayInvoice,
    assets: &Assets,
    issued: NaiveDate,
) -> Result<PathBuf, RunError> {
    info!(nights = invoice.nights(), "rendering simple proforma");
    let bytes =
        assets.pdf(invoice, PROFORMA_TITLE, Style::Paragraphs, issued, &HOTEL)?;
    let filename = Target::Simple.filename(invoice.parties());
    Ok(output::save(&assets.output_dir, &filename, &bytes)?)
}

fn write_tour(
    invoice: &TourInvoice,
    assets: &Assets,
    issued: NaiveDate,
) -> Result<PathBuf, RunError> {
    info!(tour = %invoice.tour(), "rendering tour invoice");
    let bytes =
        assets.pdf(invoice, TOUR_TITLE, Style::Table, issued, &ECO_RESERVE)?;
    let filename = Target::Tour.filename(invoice.parties());
    Ok(output::save(&assets.output_dir, &filename, &bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{Parties, StayRequest, TourRequest};
    use const_format::formatcp;
    use std::fs;
    use tempfile::TempDir;

    const AGENCY: &str = "Eco Tours!";
    const CUSTOMER: &str = "A. B.";
    const STAY_FILE: &str = formatcp!("Proforma_Invoice_{}_{}", "EcoTours", "AB");

    fn parties() -> Parties {
        Parties {
            customer: CUSTOMER.to_string(),
            agency: AGENCY.to_string(),
            agent: "Luis".to_string(),
        }
    }

    fn stay(detailed: bool) -> StayInvoice {
        StayRequest {
            parties: parties(),
            room_type: detailed.then(|| "Suite".to_string()),
            people: "2".to_string(),
            nightly_rate: "100".to_string(),
            tax_rate: detailed.then(|| "13".to_string()),
            from: "2024-01-01".to_string(),
            until: "2024-01-04".to_string(),
        }
        .validate()
        .unwrap()
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    // Points the logo somewhere that does not exist, so nothing in the
    // working directory leaks into the output.
    fn assets(dir: &TempDir) -> Assets {
        Assets::new(
            dir.path().to_path_buf(),
            Some(dir.path().join("missing-logo")),
        )
    }

    #[test]
    fn stay_as_html() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let path = write_stay(&stay(true), Format::Html, &assets(&dir), issued())?;

        assert_eq!(path, dir.path().join(formatcp!("{}.html", STAY_FILE)));
        let html = fs::read_to_string(path)?;
        assert!(html.contains("<td>$678.00</td>"));
        assert!(!html.contains("<img"));
        Ok(())
    }

    #[test]
    fn stay_as_pdf() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let path = write_stay(&stay(true), Format::Pdf, &assets(&dir), issued())?;

        assert_eq!(path, dir.path().join(formatcp!("{}.pdf", STAY_FILE)));
        assert!(fs::read(path)?.starts_with(b"%PDF"));
        Ok(())
    }

    #[test]
    fn simple_pdf() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let path = write_simple(&stay(false), &assets(&dir), issued())?;

        assert_eq!(path, dir.path().join("proforma_invoice_AB.pdf"));
        Ok(())
    }

    #[test]
    fn tour_pdf() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let invoice = TourRequest {
            parties: parties(),
            tour: "3".to_string(),
            time: "07:30".to_string(),
            participants: "4".to_string(),
            price: "50".to_string(),
            tax_rate: "0".to_string(),
        }
        .validate()?;
        let path = write_tour(&invoice, &assets(&dir), issued())?;

        assert_eq!(path, dir.path().join("tour_invoice_AB.pdf"));
        assert!(lopdf::Document::load(&path).is_ok());
        Ok(())
    }

    #[test]
    fn unreadable_logo_is_skipped() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let logo = dir.path().join("logo.jpg");
        fs::write(&logo, b"not really a jpeg")?;
        let assets = Assets::new(dir.path().to_path_buf(), Some(logo));

        assert!(assets.pdf_logo().is_none());
        write_simple(&stay(false), &assets, issued())?;
        Ok(())
    }

    #[test]
    fn html_logo_when_present() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        let logo = dir.path().join("brand.png");
        fs::write(&logo, b"png")?;
        let assets = Assets::new(dir.path().join("out"), Some(logo.clone()));

        let absolute = fs::canonicalize(&logo)?;
        assert_eq!(assets.html_logo(), Some(absolute.display().to_string()));
        Ok(())
    }

    #[test]
    fn default_logo_beside_the_page() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(HTML_LOGO), b"png")?;
        let assets = Assets::new(dir.path().to_path_buf(), None);

        assert_eq!(assets.html_logo(), Some(HTML_LOGO.to_string()));
        let path = write_stay(&stay(true), Format::Html, &assets, issued())?;
        assert!(fs::read_to_string(path)?.contains(r#"src="logo.png""#));
        Ok(())
    }

    #[test]
    fn default_logo_only_in_output_dir() -> Result<(), RunError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(HTML_LOGO), b"png")?;
        let assets = Assets::new(dir.path().join("elsewhere"), None);

        assert_eq!(assets.html_logo(), None);
        Ok(())
    }

    #[test]
    fn missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::new(dir.path().join("gone"), None);
        let result = write_simple(&stay(false), &assets, issued());
        assert!(matches!(result, Err(RunError::Io { .. })));
    }
}
