//! Field layout shared by the HTML and PDF renderers.
//!
//! An invoice is presented as titled sections of label/value pairs, in the
//! order they appear on the page. Renderers only decide how a section looks.

use crate::billing::{InvoiceTotal, StayInvoice, TourInvoice, TIME_FORMAT};

#[derive(Debug, PartialEq, Clone)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Section {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

pub trait Layout {
    fn sections(&self) -> Vec<Section>;
}

impl Layout for StayInvoice {
    fn sections(&self) -> Vec<Section> {
        let parties = self.parties();
        let mut customer = vec![
            Field::new("Customer Name", &parties.customer),
            Field::new("Agency", &parties.agency),
            Field::new("Reservations Agent", &parties.agent),
        ];
        if let Some(room_type) = self.room_type() {
            customer.push(Field::new("Room Type", room_type));
        }
        customer.push(Field::new("Number of People", self.people()));
        customer.push(Field::new(
            "Stay Dates",
            format!("{} ({} nights)", self.period(), self.nights()),
        ));

        let mut pricing = vec![Field::new(
            "Price per Night (per person)",
            self.nightly_rate(),
        )];
        pricing.extend(pricing_fields(self.total()));

        vec![
            Section {
                title: "Customer Details",
                fields: customer,
            },
            Section {
                title: "Pricing Details",
                fields: pricing,
            },
        ]
    }
}

fn pricing_fields(total: &InvoiceTotal) -> Vec<Field> {
    if total.taxes.is_empty() {
        return vec![Field::new("Total Price", total.total)];
    }

    let mut fields = vec![Field::new("Subtotal", total.subtotal)];
    for (rate, amount) in total.taxes.iter() {
        fields.push(Field::new(format!("Tax ({})", rate), amount));
    }
    fields.push(Field::new("Total Price", total.total));
    fields
}

impl Layout for TourInvoice {
    fn sections(&self) -> Vec<Section> {
        let parties = self.parties();
        let total = self.total();
        let mut fields = vec![
            Field::new("Customer Name", &parties.customer),
            Field::new("Agency", &parties.agency),
            Field::new("Reservations Agent", &parties.agent),
            Field::new("Tour Type", self.tour()),
            Field::new("Tour Time", self.time().format(TIME_FORMAT)),
            Field::new("Number of Participants", self.participants()),
            Field::new("Price per Person", self.price_per_person()),
            Field::new("Total Price (before tax)", total.subtotal),
        ];
        for (rate, amount) in total.taxes.iter() {
            fields.push(Field::new("Tax (%)", rate));
            fields.push(Field::new("Tax Amount", amount));
        }
        fields.push(Field::new("Total Price (with tax)", total.total));

        vec![Section {
            title: "Tour Details",
            fields,
        }]
    }
}

/// Contact details of the business issuing the invoice.
#[derive(Debug, PartialEq)]
pub struct Letterhead {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub website: &'static str,
}

impl Letterhead {
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.name.to_string(),
            self.address.to_string(),
            format!("Phone: {}", self.phone),
            format!("Email: {}", self.email),
            format!("Website: {}", self.website),
        ]
    }
}

pub const RESERVE: Letterhead = Letterhead {
    name: "Ecos del Bosque Wildlife Reserve",
    address: "Address Line 1, City, Country",
    phone: "(123) 456-7890",
    email: "info@wildlifereserve.com",
    website: "www.ecosdelbosquereserve.com",
};

pub const HOTEL: Letterhead = Letterhead {
    name: "Hotel Name",
    address: "Address Line 1, City, Country",
    phone: "(123) 456-7890",
    email: "contact@hotel.com",
    website: "www.hotel.com",
};

pub const ECO_RESERVE: Letterhead = Letterhead {
    name: "Your Eco Reserve",
    address: "Address Line 1, City, Country",
    phone: "(123) 456-7890",
    email: "contact@ecoreserve.com",
    website: "www.ecoreserve.com",
};

#[derive(Debug, PartialEq)]
pub struct BankAccount {
    pub number: &'static str,
    pub bank: &'static str,
    pub swift: &'static str,
}

pub const BANK_ACCOUNT: BankAccount = BankAccount {
    number: "123456789",
    bank: "XYZ Bank",
    swift: "XYZ123",
};

impl BankAccount {
    pub fn instructions(&self) -> Vec<String> {
        vec![
            "Please make the payment via bank transfer to the following account:"
                .to_string(),
            format!("Account Number: {}", self.number),
            format!("Bank Name: {}", self.bank),
            format!("SWIFT Code: {}", self.swift),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{Parties, StayRequest, TourRequest};

    fn parties() -> Parties {
        Parties {
            customer: "Jane Doe".to_string(),
            agency: "Eco Tours".to_string(),
            agent: "Luis".to_string(),
        }
    }

    fn labels(section: &Section) -> Vec<&str> {
        section.fields.iter().map(|f| f.label.as_str()).collect()
    }

    fn value<'a>(section: &'a Section, label: &str) -> Option<&'a str> {
        section
            .fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    fn stay(room_type: Option<&str>, tax_rate: Option<&str>) -> StayInvoice {
        StayRequest {
            parties: parties(),
            room_type: room_type.map(str::to_string),
            people: "2".to_string(),
            nightly_rate: "100".to_string(),
            tax_rate: tax_rate.map(str::to_string),
            from: "2024-01-01".to_string(),
            until: "2024-01-04".to_string(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn stay_sections() {
        let sections = stay(Some("Suite"), Some("13")).sections();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Customer Details");
        assert_eq!(
            labels(&sections[0]),
            vec![
                "Customer Name",
                "Agency",
                "Reservations Agent",
                "Room Type",
                "Number of People",
                "Stay Dates"
            ]
        );
        assert_eq!(
            value(&sections[0], "Stay Dates"),
            Some("2024-01-01 to 2024-01-04 (3 nights)")
        );
        assert_eq!(
            labels(&sections[1]),
            vec![
                "Price per Night (per person)",
                "Subtotal",
                "Tax (13%)",
                "Total Price"
            ]
        );
        assert_eq!(value(&sections[1], "Tax (13%)"), Some("$78.00"));
        assert_eq!(value(&sections[1], "Total Price"), Some("$678.00"));
    }

    #[test]
    fn untaxed_stay_sections() {
        let sections = stay(None, None).sections();

        assert_eq!(value(&sections[0], "Room Type"), None);
        assert_eq!(
            labels(&sections[1]),
            vec!["Price per Night (per person)", "Total Price"]
        );
        assert_eq!(value(&sections[1], "Total Price"), Some("$600.00"));
    }

    #[test]
    fn tour_rows() {
        let invoice = TourRequest {
            parties: parties(),
            tour: "5".to_string(),
            time: "09:00".to_string(),
            participants: "4".to_string(),
            price: "50".to_string(),
            tax_rate: "13".to_string(),
        }
        .validate()
        .unwrap();
        let sections = invoice.sections();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].fields.len(), 11);
        assert_eq!(value(&sections[0], "Tour Type"), Some("Farm Tour"));
        assert_eq!(value(&sections[0], "Tour Time"), Some("09:00"));
        assert_eq!(value(&sections[0], "Tax (%)"), Some("13%"));
        assert_eq!(value(&sections[0], "Tax Amount"), Some("$26.00"));
        assert_eq!(
            value(&sections[0], "Total Price (with tax)"),
            Some("$226.00")
        );
    }

    #[test]
    fn payment_instructions() {
        let lines = BANK_ACCOUNT.instructions();
        assert_eq!(lines[1], "Account Number: 123456789");
        assert_eq!(lines[3], "SWIFT Code: XYZ123");
    }
}
