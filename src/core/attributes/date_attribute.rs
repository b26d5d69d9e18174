use crate::core::attributes::Attribute;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::any::Any;
use std::io::{Error, ErrorKind};

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ss";

/// A date-valued attribute. Values live in the instance as epoch
/// milliseconds (UTC), so distance and range code treat them as numbers.
#[derive(Clone, Debug)]
pub struct DateAttribute {
    pub name: String,
    pub format: String,
    chrono_format: String,
}

impl DateAttribute {
    pub fn new(name: String, format: Option<String>) -> DateAttribute {
        let format = format.unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        let chrono_format = to_chrono_format(&format);
        DateAttribute {
            name,
            format,
            chrono_format,
        }
    }

    pub fn parse_date(&self, raw: &str) -> Result<f64, Error> {
        let raw = raw.trim();
        let parsed = NaiveDateTime::parse_from_str(raw, &self.chrono_format).or_else(|_| {
            NaiveDate::parse_from_str(raw, &self.chrono_format)
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        });

        match parsed {
            Ok(dt) => Ok(dt.and_utc().timestamp_millis() as f64),
            Err(e) => Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "Date '{raw}' does not match format '{}' of attribute {}: {e}",
                    self.format, self.name
                ),
            )),
        }
    }

    pub fn format_date(&self, millis: f64) -> Option<String> {
        if millis.is_nan() {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
            .map(|dt| dt.naive_utc().format(&self.chrono_format).to_string())
    }
}

/// Translates the SimpleDateFormat-style patterns found in ARFF headers into
/// chrono's strftime syntax. Quoted sections are copied literally.
fn to_chrono_format(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                if chars[i] == '%' {
                    out.push_str("%%");
                } else {
                    out.push(chars[i]);
                }
                i += 1;
            }
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', _) => Some("%m"),
            ('d', _) => Some("%d"),
            ('H', _) => Some("%H"),
            ('m', _) => Some("%M"),
            ('s', _) => Some("%S"),
            ('S', _) => Some("%3f"),
            ('Z', _) => Some("%z"),
            _ => None,
        };

        match token {
            Some(t) => out.push_str(t),
            None => {
                for _ in 0..run {
                    if c == '%' {
                        out.push_str("%%");
                    } else {
                        out.push(c);
                    }
                }
            }
        }
        i += run;
    }

    out
}

impl Attribute for DateAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} date \"{}\"", self.name, self.format)
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>() + self.name.capacity() + self.format.capacity() + self.chrono_format.capacity()
    }
}
