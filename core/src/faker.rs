//! Localized (pt_BR) fake data for CRM records.

use fake::faker::address::raw::CityName;
use fake::faker::company::raw::CompanyName;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::PT_BR;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CNPJ_DIGITS: usize = 14;

const CNPJ_BRANCH: [u8; 4] = [0, 0, 0, 1];
const CNPJ_WEIGHTS: [u8; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Source of Brazilian names, phones, cities, companies and CNPJs.
///
/// Every call draws fresh values; there is no caching and no way to seed it.
pub struct CrmFaker {
    rng: StdRng,
}

impl CrmFaker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn full_name(&mut self) -> String {
        Name(PT_BR).fake_with_rng(&mut self.rng)
    }

    pub fn phone_number(&mut self) -> String {
        PhoneNumber(PT_BR).fake_with_rng(&mut self.rng)
    }

    pub fn city(&mut self) -> String {
        CityName(PT_BR).fake_with_rng(&mut self.rng)
    }

    pub fn company_name(&mut self) -> String {
        CompanyName(PT_BR).fake_with_rng(&mut self.rng)
    }

    /// Random head-office CNPJ with valid check digits.
    ///
    /// Without format symbols the result is exactly 14 ASCII digits, otherwise
    /// it is laid out as `XX.XXX.XXX/XXXX-XX`.
    pub fn cnpj(&mut self, include_format_symbols: bool) -> String {
        let mut digits = [0u8; CNPJ_DIGITS];
        for d in digits.iter_mut().take(8) {
            *d = self.rng.gen_range(0..10);
        }
        digits[8..12].copy_from_slice(&CNPJ_BRANCH);
        digits[12] = cnpj_check_digit(&digits[..12]);
        digits[13] = cnpj_check_digit(&digits[..13]);

        let plain: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        if include_format_symbols {
            format_cnpj(&plain)
        } else {
            plain
        }
    }
}

impl Default for CrmFaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Mod-11 check digit over the 12 base digits (first) or base + first check (second).
fn cnpj_check_digit(digits: &[u8]) -> u8 {
    let weights = &CNPJ_WEIGHTS[CNPJ_WEIGHTS.len() - digits.len()..];
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| d as u32 * w as u32)
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        r => (11 - r) as u8,
    }
}

fn format_cnpj(plain: &str) -> String {
    format!(
        "{}.{}.{}/{}-{}",
        &plain[0..2],
        &plain[2..5],
        &plain[5..8],
        &plain[8..12],
        &plain[12..14]
    )
}

/// Accepts both the plain and the formatted layout.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u8> = cnpj
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '-'))
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()
        .unwrap_or_default();

    digits.len() == CNPJ_DIGITS
        && digits[12] == cnpj_check_digit(&digits[..12])
        && digits[13] == cnpj_check_digit(&digits[..13])
}
