use chrono::{Datelike, NaiveDate};

use crate::billing::{StayInvoice, DATE_FORMAT};
use crate::layout::{BankAccount, Layout, Letterhead, Section, BANK_ACCOUNT, RESERVE};

use askama::Template;

#[derive(Template)]
#[template(path = "proforma.html")]
struct ProformaPage<'a> {
    title: &'a str,
    issued: String,
    year: i32,
    logo: Option<&'a str>,
    sections: Vec<Section>,
    letterhead: &'a Letterhead,
    bank: &'a BankAccount,
}

/// Render a stay proforma as a standalone HTML page. `logo` is the `src` of
/// the header image, the header goes without one when it is `None`.
pub fn proforma_html(
    invoice: &StayInvoice,
    issued: NaiveDate,
    logo: Option<&str>,
) -> Result<String, askama::Error> {
    let page = ProformaPage {
        title: "PROFORMA INVOICE",
        issued: issued.format(DATE_FORMAT).to_string(),
        year: issued.year(),
        logo,
        sections: invoice.sections(),
        letterhead: &RESERVE,
        bank: &BANK_ACCOUNT,
    };

    page.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{Parties, StayRequest};

    fn invoice(customer: &str) -> StayInvoice {
        StayRequest {
            parties: Parties {
                customer: customer.to_string(),
                agency: "Eco Tours".to_string(),
                agent: "Luis".to_string(),
            },
            room_type: Some("Double".to_string()),
            people: "2".to_string(),
            nightly_rate: "100.00".to_string(),
            tax_rate: Some("13".to_string()),
            from: "2024-01-01".to_string(),
            until: "2024-01-04".to_string(),
        }
        .validate()
        .unwrap()
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn renders_fields() {
        let html =
            proforma_html(&invoice("Jane Doe"), issued(), Some("logo.png"))
                .unwrap();

        assert!(html.contains("<h1>PROFORMA INVOICE</h1>"));
        assert!(html.contains("<strong>Date:</strong> 2024-02-01"));
        assert!(html.contains("<td>Jane Doe</td>"));
        assert!(html.contains("<td>2024-01-01 to 2024-01-04 (3 nights)</td>"));
        assert!(html.contains("<td><strong>Tax (13%):</strong></td>"));
        assert!(html.contains("<td>$678.00</td>"));
        assert!(html.contains("<img src=\"logo.png\""));
        assert!(html.contains("&copy; 2024 Ecos del Bosque Wildlife Reserve"));
    }

    #[test]
    fn omits_missing_logo() {
        let html = proforma_html(&invoice("Jane Doe"), issued(), None).unwrap();
        assert!(!html.contains("<img"));
    }

    #[test]
    fn escapes_names() {
        let html =
            proforma_html(&invoice("<b>Jane</b>"), issued(), None).unwrap();
        assert!(!html.contains("<b>Jane"));
        assert!(html.contains("&lt;b&gt;Jane"));
    }
}
