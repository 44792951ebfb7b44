use crate::{Result, error::Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widest amount field on the wire (settlement amounts are 12 digits).
const MAX_AMOUNT_DIGITS: usize = 12;

/// Merchant account as assigned by the acquirer.
///
/// Supplied by configuration and never mutated by the codec. Numeric
/// identifiers are kept as strings because their leading zeros are
/// significant on the wire.
///
/// # Example
///
/// ```
/// use vitalnet_core::Merchant;
///
/// let json = r#"{
///     "bin": "999995",
///     "agent_bank": "000000",
///     "agent_chain": "111111",
///     "merchant_number": "999999999911",
///     "store": "5999",
///     "terminal": "1515",
///     "industry_code": "D",
///     "category_code": "5999",
///     "name": "ACME WIDGETS",
///     "city": "GAINESVILLE",
///     "state": "fl",
///     "zip": "32601",
///     "v_number": "00000001"
/// }"#;
///
/// let merchant: Merchant = serde_json::from_str(json).unwrap();
/// assert!(merchant.validate().is_ok());
/// assert_eq!(merchant.time_zone, "705");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Acquirer BIN (6 digits)
    pub bin: String,

    /// Agent bank number (6 digits)
    pub agent_bank: String,

    /// Agent chain number (6 digits)
    pub agent_chain: String,

    /// Merchant number (12 digits)
    pub merchant_number: String,

    /// Store number (4 digits)
    pub store: String,

    /// Terminal number (4 digits)
    pub terminal: String,

    /// Industry code (1 character)
    pub industry_code: String,

    /// Merchant category code (4 digits)
    pub category_code: String,

    pub name: String,
    pub city: String,
    pub state: String,
    pub zip: String,

    /// V number assigned to the terminal (8 digits)
    pub v_number: String,

    /// Time zone differential, 705 (EST) unless configured
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "705".to_string()
}

impl Merchant {
    /// Check every fixed-width identifier against its wire width.
    ///
    /// The request builders re-check whole records, so a bad merchant is
    /// caught either way; this reports which field is wrong.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        digits("acquirer BIN", &self.bin, 6)?;
        digits("agent bank number", &self.agent_bank, 6)?;
        digits("agent chain number", &self.agent_chain, 6)?;
        digits("merchant number", &self.merchant_number, 12)?;
        digits("store number", &self.store, 4)?;
        digits("terminal number", &self.terminal, 4)?;
        digits("merchant category code", &self.category_code, 4)?;
        digits("V number", &self.v_number, 8)?;
        digits("time zone", &self.time_zone, 3)?;

        if self.industry_code.len() != 1 || !self.industry_code.is_ascii() {
            return Err(Error::invalid_field(
                "industry code",
                format!("expected 1 character, got '{}'", self.industry_code),
            ));
        }

        for (field, value) in [
            ("merchant name", &self.name),
            ("merchant city", &self.city),
            ("merchant state", &self.state),
            ("merchant zip", &self.zip),
        ] {
            if value.is_empty() || !value.is_ascii() {
                return Err(Error::invalid_field(field, "must be non-empty ASCII"));
            }
        }

        Ok(())
    }

    /// Check that every field is US-ASCII, the only text the link carries.
    ///
    /// The request builders call this on every build; unlike
    /// [`Merchant::validate`] it says nothing about widths.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` naming the first non-ASCII field.
    pub fn ensure_ascii(&self) -> Result<()> {
        for (field, value) in [
            ("acquirer BIN", &self.bin),
            ("agent bank number", &self.agent_bank),
            ("agent chain number", &self.agent_chain),
            ("merchant number", &self.merchant_number),
            ("store number", &self.store),
            ("terminal number", &self.terminal),
            ("industry code", &self.industry_code),
            ("merchant category code", &self.category_code),
            ("merchant name", &self.name),
            ("merchant city", &self.city),
            ("merchant state", &self.state),
            ("merchant zip", &self.zip),
            ("V number", &self.v_number),
            ("time zone", &self.time_zone),
        ] {
            if !value.is_ascii() {
                return Err(Error::invalid_field(field, "must be US-ASCII"));
            }
        }
        Ok(())
    }
}

fn digits(field: &str, value: &str, width: usize) -> Result<()> {
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_field(
            field,
            format!("expected {width} digits, got '{value}'"),
        ));
    }
    Ok(())
}

/// Transaction amount in dollars and cents.
///
/// On the wire an amount is its two-decimal form with the point removed:
/// `12.34` travels as `1234`, `0.50` as `050`.
///
/// # Example
///
/// ```
/// use vitalnet_core::Amount;
///
/// let amount: Amount = "12.34".parse().unwrap();
/// assert_eq!(amount.digits(), "1234");
///
/// assert!("-1.00".parse::<Amount>().is_err());
/// assert!("1.005".parse::<Amount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAmount` for negative values, more than two
    /// fractional digits, or more than twelve digits on the wire.
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount(format!("{value} is negative")));
        }
        if value.normalize().scale() > 2 {
            return Err(Error::InvalidAmount(format!(
                "{value} has more than two decimal places"
            )));
        }

        let amount = Amount(value);
        if amount.digits().len() > MAX_AMOUNT_DIGITS {
            return Err(Error::InvalidAmount(format!(
                "{value} exceeds {MAX_AMOUNT_DIGITS} digits"
            )));
        }
        Ok(amount)
    }

    /// The amount with exactly two decimals and no decimal point.
    #[must_use]
    pub fn digits(&self) -> String {
        let mut value = self.0;
        value.rescale(2);
        value.to_string().replace('.', "")
    }

    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| Error::InvalidAmount(format!("'{s}': {e}")))?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut value = self.0;
        value.rescale(2);
        write!(f, "{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn merchant() -> Merchant {
        Merchant {
            bin: "999995".to_string(),
            agent_bank: "000000".to_string(),
            agent_chain: "111111".to_string(),
            merchant_number: "999999999911".to_string(),
            store: "5999".to_string(),
            terminal: "1515".to_string(),
            industry_code: "D".to_string(),
            category_code: "5999".to_string(),
            name: "ACME WIDGETS".to_string(),
            city: "GAINESVILLE".to_string(),
            state: "FL".to_string(),
            zip: "32601".to_string(),
            v_number: "00000001".to_string(),
            time_zone: default_time_zone(),
        }
    }

    #[rstest]
    #[case("12.34", "1234")]
    #[case("0.50", "050")]
    #[case("5", "500")]
    #[case("5.1", "510")]
    #[case("1000.00", "100000")]
    fn test_amount_digits(#[case] input: &str, #[case] expected: &str) {
        let amount: Amount = input.parse().unwrap();
        assert_eq!(amount.digits(), expected);
    }

    #[rstest]
    #[case("-1.00")]
    #[case("1.001")]
    #[case("abc")]
    #[case("")]
    #[case("99999999999.00")]
    fn test_amount_invalid(#[case] input: &str) {
        let result: Result<Amount> = input.parse();
        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_amount_display() {
        let amount: Amount = "7".parse().unwrap();
        assert_eq!(amount.to_string(), "7.00");
    }

    #[test]
    fn test_merchant_valid() {
        assert!(merchant().validate().is_ok());
        assert!(merchant().ensure_ascii().is_ok());
    }

    #[rstest]
    #[case::name(Merchant { name: "Café Ünïcødé Shop".to_string(), ..merchant() }, "merchant name")]
    #[case::city(Merchant { city: "Montréal".to_string(), ..merchant() }, "merchant city")]
    #[case::store(Merchant { store: "５９９９".to_string(), ..merchant() }, "store number")]
    fn test_merchant_non_ascii(#[case] merchant: Merchant, #[case] field_name: &str) {
        match merchant.ensure_ascii() {
            Err(Error::InvalidField { field, reason }) => {
                assert_eq!(field, field_name);
                assert_eq!(reason, "must be US-ASCII");
            }
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[rstest]
    #[case::short_bin(Merchant { bin: "99999".to_string(), ..merchant() }, "acquirer BIN")]
    #[case::alpha_store(Merchant { store: "59A9".to_string(), ..merchant() }, "store number")]
    #[case::long_v_number(Merchant { v_number: "000000001".to_string(), ..merchant() }, "V number")]
    #[case::industry(Merchant { industry_code: "DD".to_string(), ..merchant() }, "industry code")]
    #[case::empty_city(Merchant { city: String::new(), ..merchant() }, "merchant city")]
    fn test_merchant_invalid(#[case] merchant: Merchant, #[case] field_name: &str) {
        match merchant.validate() {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, field_name),
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_merchant_time_zone_default() {
        let json = serde_json::to_value(merchant()).unwrap();
        let mut object = json.as_object().unwrap().clone();
        object.remove("time_zone");

        let parsed: Merchant = serde_json::from_value(object.into()).unwrap();
        assert_eq!(parsed.time_zone, "705");
    }
}
