//! Fake data generators behind `{{faker.<name>}}` placeholders.
//!
//! Every call generates a fresh value; nothing is cached or seeded.

use fake::faker::address::en::{BuildingNumber, CityName, CountryName, StreetName};
use fake::faker::boolean::en::Boolean;
use fake::faker::chrono::en::DateTime;
use fake::faker::company::en::CompanyName;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{SafeEmail, UserAgent, IPv4};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::Rng;

/// The generator catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Name,
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    Address,
    City,
    Country,
    Uuid,
    Word,
    Sentence,
    Paragraph,
    Ipv4,
    UserAgent,
    Number,
    Boolean,
    Date,
    Time,
    HexColor,
    CurrencyCode,
}

impl Generator {
    pub const ALL: [Generator; 21] = [
        Generator::Name,
        Generator::FirstName,
        Generator::LastName,
        Generator::Email,
        Generator::Phone,
        Generator::Company,
        Generator::Address,
        Generator::City,
        Generator::Country,
        Generator::Uuid,
        Generator::Word,
        Generator::Sentence,
        Generator::Paragraph,
        Generator::Ipv4,
        Generator::UserAgent,
        Generator::Number,
        Generator::Boolean,
        Generator::Date,
        Generator::Time,
        Generator::HexColor,
        Generator::CurrencyCode,
    ];

    /// Look up a generator by its placeholder name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let generator = match name {
            "name" => Generator::Name,
            "first_name" => Generator::FirstName,
            "last_name" => Generator::LastName,
            "email" => Generator::Email,
            "phone" => Generator::Phone,
            "company" => Generator::Company,
            "address" => Generator::Address,
            "city" => Generator::City,
            "country" => Generator::Country,
            "uuid" => Generator::Uuid,
            "word" => Generator::Word,
            "sentence" => Generator::Sentence,
            "paragraph" => Generator::Paragraph,
            "ipv4" => Generator::Ipv4,
            "user_agent" => Generator::UserAgent,
            "number" => Generator::Number,
            "boolean" => Generator::Boolean,
            "date" => Generator::Date,
            "time" => Generator::Time,
            "hex_color" => Generator::HexColor,
            "currency_code" => Generator::CurrencyCode,
            _ => return None,
        };
        Some(generator)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Name => "name",
            Generator::FirstName => "first_name",
            Generator::LastName => "last_name",
            Generator::Email => "email",
            Generator::Phone => "phone",
            Generator::Company => "company",
            Generator::Address => "address",
            Generator::City => "city",
            Generator::Country => "country",
            Generator::Uuid => "uuid",
            Generator::Word => "word",
            Generator::Sentence => "sentence",
            Generator::Paragraph => "paragraph",
            Generator::Ipv4 => "ipv4",
            Generator::UserAgent => "user_agent",
            Generator::Number => "number",
            Generator::Boolean => "boolean",
            Generator::Date => "date",
            Generator::Time => "time",
            Generator::HexColor => "hex_color",
            Generator::CurrencyCode => "currency_code",
        }
    }

    /// Generate a fresh value.
    pub fn generate(&self) -> String {
        match self {
            Generator::Name => Name().fake(),
            Generator::FirstName => FirstName().fake(),
            Generator::LastName => LastName().fake(),
            Generator::Email => SafeEmail().fake(),
            Generator::Phone => PhoneNumber().fake(),
            Generator::Company => CompanyName().fake(),
            Generator::Address => {
                let number: String = BuildingNumber().fake();
                let street: String = StreetName().fake();
                format!("{number} {street}")
            }
            Generator::City => CityName().fake(),
            Generator::Country => CountryName().fake(),
            Generator::Uuid => uuid::Uuid::new_v4().to_string(),
            Generator::Word => Word().fake(),
            Generator::Sentence => Sentence(5..6).fake(),
            Generator::Paragraph => Paragraph(1..3).fake(),
            Generator::Ipv4 => IPv4().fake(),
            Generator::UserAgent => UserAgent().fake(),
            Generator::Number => rand::thread_rng().gen_range(1..=1000).to_string(),
            Generator::Boolean => {
                let flag: bool = Boolean(50).fake();
                flag.to_string()
            }
            Generator::Date => {
                let at: chrono::DateTime<chrono::Utc> = DateTime().fake();
                at.format("%Y-%m-%d").to_string()
            }
            Generator::Time => {
                let at: chrono::DateTime<chrono::Utc> = DateTime().fake();
                at.format("%H:%M:%S").to_string()
            }
            Generator::HexColor => {
                let rgb: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
                format!("#{rgb:06x}")
            }
            Generator::CurrencyCode => CurrencyCode().fake(),
        }
    }
}
