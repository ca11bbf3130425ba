use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::core::error::{AdminError, EntryError, ExitError};
use crate::models::config::ParkingConfig;
use crate::models::user::NewUser;

// ASCII only: three letters then three digits
static MATRICULA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").expect("valid matricula regex"));

/// Whether `value` is a license plate of the form ABC123 (any letter case)
pub fn is_valid_matricula(value: &str) -> bool {
    MATRICULA_RE.is_match(value)
}

/// Trimmed value of a required text field, `None` when blank
fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parking plan chosen at entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Plan {
    OneHour,
    TwoHours,
    FourHours,
    /// Charged as a single hour
    Flexible,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::OneHour, Plan::TwoHours, Plan::FourHours, Plan::Flexible];

    /// Hours billed up front, `None` for the flexible plan
    pub fn hours(self) -> Option<u32> {
        match self {
            Plan::OneHour => Some(1),
            Plan::TwoHours => Some(2),
            Plan::FourHours => Some(4),
            Plan::Flexible => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::OneHour => "1",
            Plan::TwoHours => "2",
            Plan::FourHours => "4",
            Plan::Flexible => "flexible",
        }
    }

    /// Price charged at entry for this plan
    pub fn price(self, hourly_rate: f64) -> f64 {
        match self.hours() {
            Some(hours) => f64::from(hours) * hourly_rate,
            None => hourly_rate,
        }
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Plan::OneHour),
            "2" => Ok(Plan::TwoHours),
            "4" => Ok(Plan::FourHours),
            "flexible" => Ok(Plan::Flexible),
            other => Err(other.to_string()),
        }
    }
}

impl TryFrom<String> for Plan {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Plan> for String {
    fn from(plan: Plan) -> Self {
        plan.as_str().to_string()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry form as submitted by the operator
#[derive(Debug, Deserialize)]
pub struct EntryParams {
    pub cedula: String,
    pub matricula: String,
    /// One of "1", "2", "4" or "flexible"
    pub plan: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub cedula: String,
    /// Uppercased
    pub matricula: String,
    pub plan: Plan,
}

impl EntryParams {
    pub fn validate(self) -> Result<ValidatedEntry, EntryError> {
        let cedula = required(&self.cedula).ok_or(EntryError::MissingField("cédula"))?;
        let matricula = required(&self.matricula).ok_or(EntryError::MissingField("matrícula"))?;

        if !is_valid_matricula(&matricula) {
            return Err(EntryError::InvalidMatricula);
        }

        let plan = self.plan.parse::<Plan>().map_err(EntryError::InvalidPlan)?;

        Ok(ValidatedEntry {
            cedula,
            matricula: matricula.to_uppercase(),
            plan,
        })
    }
}

/// Exit verification form
#[derive(Debug, Deserialize)]
pub struct ExitParams {
    pub cedula: String,
    pub matricula: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedExit {
    pub cedula: String,
    pub matricula: String,
}

impl ExitParams {
    pub fn validate(self) -> Result<ValidatedExit, ExitError> {
        let cedula = required(&self.cedula).ok_or(ExitError::MissingField("cédula"))?;
        let matricula = required(&self.matricula).ok_or(ExitError::MissingField("matrícula"))?;

        Ok(ValidatedExit { cedula, matricula })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

impl LoginParams {
    pub fn validate(self) -> Result<LoginParams, AdminError> {
        if self.username.is_empty() {
            return Err(AdminError::MissingField("usuario"));
        }
        if self.password.is_empty() {
            return Err(AdminError::MissingField("contraseña"));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewUserParams {
    pub user: String,
    pub password: String,
}

impl NewUserParams {
    /// Both fields are required; uniqueness is left to the parking service
    pub fn validate(self) -> Result<NewUser, AdminError> {
        let username = required(&self.user).ok_or(AdminError::MissingField("usuario"))?;
        if self.password.is_empty() {
            return Err(AdminError::MissingField("contraseña"));
        }

        Ok(NewUser {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfigParams {
    pub slot: i64,
    pub precio: f64,
}

impl ConfigParams {
    pub fn validate(self) -> Result<ParkingConfig, AdminError> {
        let slot = u32::try_from(self.slot).map_err(|_| {
            AdminError::InvalidConfig(format!("espacios fuera de rango: {}", self.slot))
        })?;

        if !self.precio.is_finite() || self.precio < 0.0 {
            return Err(AdminError::InvalidConfig(format!(
                "tarifa inválida: {}",
                self.precio
            )));
        }

        Ok(ParkingConfig {
            slot,
            precio: self.precio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cedula: &str, matricula: &str, plan: &str) -> EntryParams {
        EntryParams {
            cedula: cedula.to_string(),
            matricula: matricula.to_string(),
            plan: plan.to_string(),
        }
    }

    #[test]
    fn test_matricula_accepts_three_letters_three_digits() {
        assert!(is_valid_matricula("ABC123"));
        assert!(is_valid_matricula("abc123"));
        assert!(is_valid_matricula("aBc987"));
    }

    #[test]
    fn test_matricula_rejects_other_shapes() {
        assert!(!is_valid_matricula("AB123"));
        assert!(!is_valid_matricula("ABCD12"));
        assert!(!is_valid_matricula("123ABC"));
        assert!(!is_valid_matricula("ABC1234"));
        assert!(!is_valid_matricula("ABC 123"));
        assert!(!is_valid_matricula(""));
        // Non-ASCII digits and letters
        assert!(!is_valid_matricula("ÁBC123"));
        assert!(!is_valid_matricula("ABC١٢٣"));
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("1".parse::<Plan>(), Ok(Plan::OneHour));
        assert_eq!("2".parse::<Plan>(), Ok(Plan::TwoHours));
        assert_eq!("4".parse::<Plan>(), Ok(Plan::FourHours));
        assert_eq!("flexible".parse::<Plan>(), Ok(Plan::Flexible));
        assert!("3".parse::<Plan>().is_err());
        assert!("".parse::<Plan>().is_err());
    }

    #[test]
    fn test_plan_prices() {
        assert_eq!(Plan::OneHour.price(5.0), 5.0);
        assert_eq!(Plan::TwoHours.price(5.0), 10.0);
        assert_eq!(Plan::FourHours.price(5.0), 20.0);
        assert_eq!(Plan::Flexible.price(5.0), 5.0);
    }

    #[test]
    fn test_plan_serde_as_string() {
        assert_eq!(serde_json::to_value(Plan::Flexible).unwrap(), "flexible");
        let plan: Plan = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(plan, Plan::FourHours);
    }

    #[test]
    fn test_entry_validation_uppercases_matricula() {
        let validated = entry(" 1020 ", "abc123", "2").validate().unwrap();
        assert_eq!(validated.cedula, "1020");
        assert_eq!(validated.matricula, "ABC123");
        assert_eq!(validated.plan, Plan::TwoHours);
    }

    #[test]
    fn test_entry_validation_errors() {
        assert!(matches!(
            entry("", "ABC123", "1").validate(),
            Err(EntryError::MissingField(_))
        ));
        assert!(matches!(
            entry("1020", "AB123", "1").validate(),
            Err(EntryError::InvalidMatricula)
        ));
        assert!(matches!(
            entry("1020", "ABC123", "8").validate(),
            Err(EntryError::InvalidPlan(_))
        ));
    }

    #[test]
    fn test_exit_validation() {
        let params = ExitParams {
            cedula: "  ".to_string(),
            matricula: "ABC123".to_string(),
        };
        assert!(matches!(params.validate(), Err(ExitError::MissingField(_))));
    }

    #[test]
    fn test_new_user_requires_both_fields() {
        let missing_password = NewUserParams {
            user: "operador".to_string(),
            password: String::new(),
        };
        assert!(missing_password.validate().is_err());

        let ok = NewUserParams {
            user: "operador".to_string(),
            password: "pw".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.username, "operador");
    }

    #[test]
    fn test_config_validation() {
        let ok = ConfigParams { slot: 40, precio: 2.5 }.validate().unwrap();
        assert_eq!(ok, ParkingConfig { slot: 40, precio: 2.5 });

        assert!(ConfigParams { slot: -1, precio: 2.5 }.validate().is_err());
        assert!(ConfigParams { slot: 10, precio: -3.0 }.validate().is_err());
        assert!(ConfigParams { slot: 10, precio: f64::NAN }.validate().is_err());
    }
}
