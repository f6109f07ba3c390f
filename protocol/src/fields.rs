use std::str::FromStr;

use crate::ProtocolError;

/// Field delimiter shared by every inbound and outbound line.
pub const FIELD_DELIMITER: char = '|';

/// A raw protocol line split into its `|`-separated fields.
///
/// Construction validates the prefix and minimum field count; accessors then
/// report any missing or mistyped field as [`ProtocolError::Malformed`]
/// carrying the whole line.
#[derive(Clone, Debug)]
pub struct MessageFields<'a> {
    raw: &'a str,
    message_type: &'static str,
    parts: Vec<&'a str>,
}

impl<'a> MessageFields<'a> {
    /// Splits `raw` and checks it against the expected shape.
    ///
    /// When `prefix` is provided the first field must equal it exactly. The
    /// line must contain at least `min_fields` fields, counting the prefix.
    pub fn parse(
        raw: &'a str,
        prefix: Option<&str>,
        message_type: &'static str,
        min_fields: usize,
    ) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        let prefix_matches = prefix.map_or(true, |prefix| parts.first() == Some(&prefix));
        if !prefix_matches || parts.len() < min_fields {
            return Err(ProtocolError::malformed(message_type, raw));
        }

        Ok(Self {
            raw,
            message_type,
            parts,
        })
    }

    /// Line exactly as received.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Name of the message kind the line was parsed as.
    #[must_use]
    pub fn message_type(&self) -> &'static str {
        self.message_type
    }

    /// Number of fields, counting the prefix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Reports whether the line contained no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// String field at `index`.
    pub fn text(&self, index: usize) -> Result<&'a str, ProtocolError> {
        self.parts
            .get(index)
            .copied()
            .ok_or_else(|| self.malformed())
    }

    /// Numeric field at `index`, parsed as `T`.
    pub fn integer<T: FromStr>(&self, index: usize) -> Result<T, ProtocolError> {
        self.text(index)?
            .trim()
            .parse::<T>()
            .map_err(|_| self.malformed())
    }

    /// Flag field at `index`; the wire encodes true as `1`.
    pub fn flag(&self, index: usize) -> Result<bool, ProtocolError> {
        Ok(self.integer::<i64>(index)? == 1)
    }

    /// Every field from `start` onwards.
    #[must_use]
    pub fn rest(&self, start: usize) -> &[&'a str] {
        self.parts.get(start..).unwrap_or(&[])
    }

    /// Error describing this line as malformed.
    #[must_use]
    pub fn malformed(&self) -> ProtocolError {
        ProtocolError::malformed(self.message_type, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_wrong_prefix() {
        let error = MessageFields::parse("X|1", Some("B"), "begin turn", 2).unwrap_err();
        assert!(matches!(
            error,
            ProtocolError::Malformed {
                message_type: "begin turn",
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_short_lines() {
        assert!(MessageFields::parse("O|1|2", Some("O"), "discovered object", 5).is_err());
    }

    #[test]
    fn integer_reports_non_numeric_fields() {
        let fields = MessageFields::parse("B|seven", Some("B"), "begin turn", 2).expect("shape");
        let error = fields.integer::<u32>(1).unwrap_err();
        assert_eq!(error.to_string(), "invalid begin turn message: B|seven");
    }

    #[test]
    fn missing_prefix_check_accepts_any_first_field() {
        let fields = MessageFields::parse("anything|at|all", None, "free form", 3).expect("shape");
        assert_eq!(fields.text(2).expect("field"), "all");
        assert_eq!(fields.rest(1), &["at", "all"]);
        assert!(fields.text(3).is_err());
    }
}
