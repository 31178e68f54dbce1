use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::error::InvoiceError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const CUSTOMER: &str = "Customer name";
const AGENCY: &str = "Agency name";
const AGENT: &str = "Reservations agent";
const PEOPLE: &str = "Number of people";
const PARTICIPANTS: &str = "Number of participants";
const PRICE_PER_NIGHT: &str = "Price per night";
const PRICE_PER_PERSON: &str = "Price per person";
const TAX_RATE: &str = "Tax rate";
const START_DATE: &str = "start date";
const END_DATE: &str = "End date";
const TOUR_TIME: &str = "tour time";

const POSITIVE: &str = "must be greater than 0";
const TOO_LARGE: &str = "is too large";

/// An amount in USD. Arithmetic is exact, rounding to cents only happens
/// when the amount is displayed.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    fn checked_mul(self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl Add<Money> for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        write!(f, "${:.2}", cents)
    }
}

/// A tax rate as a percentage, `13` meaning 13%.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TaxRate(Decimal);

impl TaxRate {
    pub fn new(percentage: Decimal) -> Result<Self, InvoiceError> {
        if percentage < Decimal::ZERO {
            return Err(InvoiceError::range(TAX_RATE, "must not be negative"));
        }
        Ok(Self(percentage))
    }

    pub fn of(&self, amount: Money) -> Result<Money, InvoiceError> {
        amount
            .0
            .checked_mul(self.0)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .map(Money)
            .ok_or_else(|| InvoiceError::range(TAX_RATE, TOO_LARGE))
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceTotal {
    pub subtotal: Money,
    pub taxes: Vec<(TaxRate, Money)>,
    pub total: Money,
}

impl InvoiceTotal {
    fn new(subtotal: Money, tax_rates: &[TaxRate]) -> Result<Self, InvoiceError> {
        let taxes = tax_rates
            .iter()
            .map(|rate| Ok((*rate, rate.of(subtotal)?)))
            .collect::<Result<Vec<(TaxRate, Money)>, InvoiceError>>()?;
        let total = taxes
            .iter()
            .try_fold(subtotal, |a, (_, x)| a.checked_add(*x))
            .ok_or_else(|| InvoiceError::range(TAX_RATE, TOO_LARGE))?;

        Ok(Self {
            subtotal,
            taxes,
            total,
        })
    }

    pub fn tax_amount(&self) -> Money {
        self.taxes.iter().fold(Money::ZERO, |a, (_, x)| a + *x)
    }
}

impl fmt::Display for InvoiceTotal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtotal: {}", self.subtotal)?;
        for (tax_rate, amount) in self.taxes.iter() {
            writeln!(f, "Tax ({}): {}", tax_rate, amount)?;
        }

        write!(f, "\nTotal: {}", self.total)
    }
}

/// Dates of a stay, `until` being the day of departure.
#[derive(Debug, PartialEq, Clone)]
pub struct Period {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl Period {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Result<Self, InvoiceError> {
        if until <= from {
            return Err(InvoiceError::range(
                END_DATE,
                "must be after the start date",
            ));
        }
        Ok(Self { from, until })
    }

    pub fn nights(&self) -> u32 {
        // `new` guarantees a positive span well inside u32
        (self.until - self.from).num_days() as u32
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.from.format(DATE_FORMAT),
            self.until.format(DATE_FORMAT)
        )
    }
}

#[derive(Display, EnumIter, Debug, PartialEq, Eq, Clone, Copy)]
pub enum TourType {
    #[strum(serialize = "Twilight Nightwalk")]
    TwilightNightwalk,
    #[strum(serialize = "Nightwalk")]
    Nightwalk,
    #[strum(serialize = "Natural History Hike")]
    NaturalHistoryHike,
    #[strum(serialize = "Farm and Natural Medicine Combo Tour")]
    FarmAndMedicineCombo,
    #[strum(serialize = "Farm Tour")]
    FarmTour,
    #[strum(serialize = "Medicinal Plants")]
    MedicinalPlants,
}

/// Pick a variant from a menu numbered from 1 in declaration order.
pub fn choose<T: IntoEnumIterator>(input: &str) -> Result<T, InvoiceError> {
    let options = T::iter().count();
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=options).contains(n))
        .and_then(|n| T::iter().nth(n - 1))
        .ok_or_else(|| InvoiceError::Selection {
            input: input.to_string(),
            options,
        })
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Parties {
    pub customer: String,
    pub agency: String,
    pub agent: String,
}

impl Parties {
    fn checked(&self) -> Result<Self, InvoiceError> {
        Ok(Self {
            customer: non_blank(CUSTOMER, &self.customer)?,
            agency: non_blank(AGENCY, &self.agency)?,
            agent: non_blank(AGENT, &self.agent)?,
        })
    }
}

/// Raw answers for an accommodation proforma. A `tax_rate` of `None`
/// produces an invoice without any tax lines.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct StayRequest {
    pub parties: Parties,
    pub room_type: Option<String>,
    pub people: String,
    pub nightly_rate: String,
    pub tax_rate: Option<String>,
    pub from: String,
    pub until: String,
}

impl StayRequest {
    pub fn validate(&self) -> Result<StayInvoice, InvoiceError> {
        let parties = self.parties.checked()?;

        let people = parse_count(PEOPLE, &self.people)?;
        let nightly_rate = parse_decimal(PRICE_PER_NIGHT, &self.nightly_rate)?;
        let tax_rate = self
            .tax_rate
            .as_deref()
            .map(|rate| parse_decimal(TAX_RATE, rate))
            .transpose()?;

        let people = positive_count(PEOPLE, people)?;
        let nightly_rate = positive_price(PRICE_PER_NIGHT, nightly_rate)?;
        let tax_rates: Vec<TaxRate> =
            tax_rate.map(TaxRate::new).transpose()?.into_iter().collect();

        let from = parse_date(START_DATE, &self.from)?;
        let until = parse_date(END_DATE, &self.until)?;
        let period = Period::new(from, until)?;

        let subtotal = nightly_rate
            .checked_mul(Decimal::from(people))
            .and_then(|m| m.checked_mul(Decimal::from(period.nights())))
            .ok_or_else(|| InvoiceError::range(PRICE_PER_NIGHT, TOO_LARGE))?;

        Ok(StayInvoice {
            parties,
            room_type: self.room_type.as_ref().map(|r| r.trim().to_string()),
            people,
            nightly_rate,
            period,
            total: InvoiceTotal::new(subtotal, &tax_rates)?,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct StayInvoice {
    parties: Parties,
    room_type: Option<String>,
    people: u32,
    nightly_rate: Money,
    period: Period,
    total: InvoiceTotal,
}

impl StayInvoice {
    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    pub fn room_type(&self) -> Option<&str> {
        self.room_type.as_deref()
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn nightly_rate(&self) -> Money {
        self.nightly_rate
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn nights(&self) -> u32 {
        self.period.nights()
    }

    pub fn total(&self) -> &InvoiceTotal {
        &self.total
    }
}

/// Raw answers for a guided tour invoice; `tour` is the menu number.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TourRequest {
    pub parties: Parties,
    pub tour: String,
    pub time: String,
    pub participants: String,
    pub price: String,
    pub tax_rate: String,
}

impl TourRequest {
    pub fn validate(&self) -> Result<TourInvoice, InvoiceError> {
        let parties = self.parties.checked()?;

        let participants = parse_count(PARTICIPANTS, &self.participants)?;
        let price = parse_decimal(PRICE_PER_PERSON, &self.price)?;
        let tax_rate = parse_decimal(TAX_RATE, &self.tax_rate)?;

        let participants = positive_count(PARTICIPANTS, participants)?;
        let price = positive_price(PRICE_PER_PERSON, price)?;
        let tax_rate = TaxRate::new(tax_rate)?;

        let time = NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT)
            .map_err(|_| {
                InvoiceError::parse(
                    TOUR_TIME,
                    &self.time,
                    "HH:MM in 24-hour format",
                )
            })?;

        let tour = choose::<TourType>(&self.tour)?;

        let subtotal = price
            .checked_mul(Decimal::from(participants))
            .ok_or_else(|| InvoiceError::range(PRICE_PER_PERSON, TOO_LARGE))?;

        Ok(TourInvoice {
            parties,
            tour,
            time,
            participants,
            price,
            total: InvoiceTotal::new(subtotal, &[tax_rate])?,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct TourInvoice {
    parties: Parties,
    tour: TourType,
    time: NaiveTime,
    participants: u32,
    price: Money,
    total: InvoiceTotal,
}

impl TourInvoice {
    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    pub fn tour(&self) -> TourType {
        self.tour
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn participants(&self) -> u32 {
        self.participants
    }

    pub fn price_per_person(&self) -> Money {
        self.price
    }

    pub fn total(&self) -> &InvoiceTotal {
        &self.total
    }
}

fn non_blank(field: &'static str, input: &str) -> Result<String, InvoiceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvoiceError::Blank { field });
    }
    Ok(trimmed.to_string())
}

fn parse_count(field: &'static str, input: &str) -> Result<i64, InvoiceError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| InvoiceError::parse(field, input, "a whole number"))
}

fn parse_decimal(
    field: &'static str,
    input: &str,
) -> Result<Decimal, InvoiceError> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| InvoiceError::parse(field, input, "a number"))
}

fn parse_date(
    field: &'static str,
    input: &str,
) -> Result<NaiveDate, InvoiceError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| InvoiceError::parse(field, input, "YYYY-MM-DD"))
}

fn positive_count(field: &'static str, count: i64) -> Result<u32, InvoiceError> {
    if count <= 0 {
        return Err(InvoiceError::range(field, POSITIVE));
    }
    u32::try_from(count).map_err(|_| InvoiceError::range(field, "is too large"))
}

fn positive_price(
    field: &'static str,
    price: Decimal,
) -> Result<Money, InvoiceError> {
    if price <= Decimal::ZERO {
        return Err(InvoiceError::range(field, POSITIVE));
    }
    Ok(Money::new(price))
}
