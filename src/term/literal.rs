//! RDF literals

use super::{NamedNode, Value};
use crate::namespace::{rdf, xsd};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;

/// Largest integer an IEEE double represents exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// RDF literal value
///
/// A literal always carries a datatype. Language-tagged literals are
/// `rdf:langString`, untyped ones default to `xsd:string`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: Arc<str>,
    language: Option<Arc<str>>,
    datatype: NamedNode,
}

impl Literal {
    /// Create a literal. A non-empty language wins over any datatype.
    pub fn new(
        value: impl Into<String>,
        language: Option<&str>,
        datatype: Option<NamedNode>,
    ) -> Self {
        match language.filter(|lang| !lang.is_empty()) {
            Some(lang) => Self::new_language_tagged(value, lang),
            None => match datatype {
                Some(dt) => Self::new_typed(value, dt),
                None => Self::new_simple(value),
            },
        }
    }

    /// Create a simple literal (xsd:string)
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self::new_typed(value, xsd::string())
    }

    /// Create a literal with language tag
    pub fn new_language_tagged(value: impl Into<String>, language: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.into()),
            language: Some(Arc::from(language.as_ref())),
            datatype: rdf::lang_string(),
        }
    }

    /// Create a typed literal
    pub fn new_typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: Arc::from(value.into()),
            language: None,
            datatype,
        }
    }

    /// `"1"` or `"0"` typed xsd:boolean
    pub fn from_bool(value: bool) -> Self {
        Self::new_typed(if value { "1" } else { "0" }, xsd::boolean())
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new_typed(value.to_string(), xsd::integer())
    }

    /// Integral values within the safe range become xsd:integer, other
    /// plain decimals xsd:decimal, and anything that needs an exponent
    /// xsd:double.
    pub fn from_f64(value: f64) -> Self {
        let magnitude = value.abs();
        if !value.is_finite() {
            let lexical = if value.is_nan() {
                "NaN"
            } else if value > 0.0 {
                "INF"
            } else {
                "-INF"
            };
            return Self::new_typed(lexical, xsd::double());
        }
        if magnitude > MAX_SAFE_INTEGER || (magnitude != 0.0 && magnitude < 1e-6) {
            return Self::new_typed(format!("{:e}", value), xsd::double());
        }
        if value.fract() == 0.0 {
            Self::new_typed(format!("{}", value as i64), xsd::integer())
        } else {
            Self::new_typed(format!("{}", value), xsd::decimal())
        }
    }

    /// UTC timestamp at second precision, typed xsd:dateTime
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self::new_typed(
            value.to_rfc3339_opts(SecondsFormat::Secs, true),
            xsd::date_time(),
        )
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Get the datatype
    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    /// N-Triples form. The datatype is omitted for xsd:string and for
    /// language-tagged literals.
    pub fn to_nt(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + 2);
        out.push('"');
        out.push_str(&escape(&self.value));
        out.push('"');
        if let Some(lang) = self.language() {
            out.push('@');
            out.push_str(lang);
        } else if self.datatype != xsd::string() {
            out.push_str("^^");
            out.push_str(&self.datatype.to_nt());
        }
        out
    }

    pub(super) fn to_native(&self) -> Value {
        let dt = self.datatype.as_str();
        let lexical = self.value();
        if dt == xsd::BOOLEAN {
            return Value::Bool(lexical == "1" || lexical == "true");
        }
        if dt == xsd::DATE_TIME {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(lexical) {
                return Value::DateTime(parsed.with_timezone(&Utc));
            }
        }
        if dt == xsd::DATE {
            if let Some(midnight) = NaiveDate::parse_from_str(lexical, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                return Value::DateTime(midnight.and_utc());
            }
        }
        if dt == xsd::INTEGER {
            if let Ok(n) = lexical.parse::<i64>() {
                return Value::Integer(n);
            }
        }
        if dt == xsd::INTEGER || dt == xsd::DECIMAL || dt == xsd::FLOAT || dt == xsd::DOUBLE {
            if let Ok(n) = lexical.parse::<f64>() {
                return Value::Float(n);
            }
        }
        Value::Str(lexical.to_string())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nt())
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

pub(super) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
