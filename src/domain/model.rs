use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A customer review as kept in persistent storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Caballeros,
    Damas,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Caballeros => "caballeros",
            Category::Damas => "damas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caballeros" => Ok(Category::Caballeros),
            "damas" => Ok(Category::Damas),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: u32,
    pub price: u32,
    pub category: Category,
}

/// Opening window used when slots are enumerated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub close_hour: u32,
    pub interval_minutes: u32,
    /// The shop's fixed UTC offset. Bogotá has no DST.
    pub utc_offset_hours: i32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_hour: 8,
            close_hour: 19,
            interval_minutes: 15,
            utc_offset_hours: -5,
        }
    }
}

impl BusinessHours {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// A candidate appointment. `time` is the value the booking form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub time: String,
    pub display: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Raw booking form input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
}

impl BookingForm {
    pub fn reset(&mut self) {
        *self = BookingForm::default();
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

/// Payload sent once to the booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub duration: u32,
    pub date: String,
    pub time: String,
    pub formatted_date: String,
    pub formatted_time: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub service: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn other(&self) -> Locale {
        match self {
            Locale::Es => Locale::En,
            Locale::En => Locale::Es,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_json_shape() {
        let review = Review {
            name: "Carlos".to_string(),
            rating: 5,
            comment: "Excelente".to_string(),
            date: "Hace unos momentos".to_string(),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Carlos",
                "rating": 5,
                "comment": "Excelente",
                "date": "Hace unos momentos"
            })
        );
    }

    #[test]
    fn test_booking_request_uses_camel_case() {
        let request = BookingRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "3001234567".to_string(),
            service_name: "Corte de Cabello".to_string(),
            duration: 30,
            date: "2030-03-15".to_string(),
            time: "09:00".to_string(),
            formatted_date: "15 de marzo de 2030".to_string(),
            formatted_time: "9:00 AM".to_string(),
            start_time: "2030-03-15T09:00:00-05:00".to_string(),
            end_time: "2030-03-15T09:30:00-05:00".to_string(),
            location: "Carrera 54 #55-53 local 1".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["serviceName"], "Corte de Cabello");
        assert_eq!(value["formattedTime"], "9:00 AM");
        assert_eq!(value["startTime"], "2030-03-15T09:00:00-05:00");
    }

    #[test]
    fn test_locale_parse_and_flip() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::Es.other(), Locale::En);
        assert_eq!(Locale::default(), Locale::Es);
    }
}
