//! Line codec for persisted records
//!
//! One record per line, fields separated by [`FIELD_SEPARATOR`]:
//!
//! ```text
//! code|subject_code|subject_name|semester|year|seats|registered|price
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::domain::Course;

/// Field separator of the persisted line format.
pub const FIELD_SEPARATOR: char = '|';

/// Number of fields in a persisted course line.
pub const COURSE_FIELDS: usize = 8;

/// Reasons a line cannot be decoded into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("empty key field")]
    EmptyKey,

    #[error("invalid number in field '{field}': {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Turns a line of text into a record and back.
pub trait RecordCodec {
    type Record;

    fn decode(&self, line: &str) -> Result<Self::Record, CodecError>;

    /// Deterministic single-line serialization, without line terminator.
    fn encode(&self, record: &Self::Record) -> String;
}

/// Codec for [`Course`] lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourseCodec;

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, CodecError> {
    value.parse().map_err(|_| CodecError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl RecordCodec for CourseCodec {
    type Record = Course;

    fn decode(&self, line: &str) -> Result<Course, CodecError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        if fields.len() != COURSE_FIELDS {
            return Err(CodecError::FieldCount {
                expected: COURSE_FIELDS,
                found: fields.len(),
            });
        }
        if fields[0].is_empty() {
            return Err(CodecError::EmptyKey);
        }

        Ok(Course {
            code: fields[0].to_string(),
            subject_code: fields[1].to_string(),
            subject_name: fields[2].to_string(),
            semester: fields[3].to_string(),
            year: fields[4].to_string(),
            seats: parse_number("seats", fields[5])?,
            registered: parse_number("registered", fields[6])?,
            price: parse_number("price", fields[7])?,
        })
    }

    fn encode(&self, course: &Course) -> String {
        [
            course.code.clone(),
            course.subject_code.clone(),
            course.subject_name.clone(),
            course.semester.clone(),
            course.year.clone(),
            course.seats.to_string(),
            course.registered.to_string(),
            course.price.to_string(),
        ]
        .join(&FIELD_SEPARATOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINE: &str = "CS101-SP24|CS101|Intro to Programming|Spring|2024|30|12|450.5";

    #[test]
    fn given_valid_line_when_decoding_then_returns_course() {
        let course = CourseCodec.decode(LINE).unwrap();
        assert_eq!(course.code, "CS101-SP24");
        assert_eq!(course.subject_name, "Intro to Programming");
        assert_eq!(course.seats, 30);
        assert_eq!(course.registered, 12);
        assert_eq!(course.price, 450.5);
    }

    #[test]
    fn given_padded_fields_when_decoding_then_fields_are_trimmed() {
        let course = CourseCodec
            .decode(" MA201 | MA201 | Linear Algebra | Fall | 2023 | 25 | 0 | 300 ")
            .unwrap();
        assert_eq!(course.code, "MA201");
        assert_eq!(course.semester, "Fall");
        assert_eq!(course.price, 300.0);
    }

    #[rstest]
    #[case("CS101|CS101|Intro|Spring|2024|30|12", 7)]
    #[case("CS101|CS101|Intro|Spring|2024|30|12|450|extra", 9)]
    #[case("just one field", 1)]
    fn given_wrong_field_count_when_decoding_then_rejects(#[case] line: &str, #[case] found: usize) {
        assert_eq!(
            CourseCodec.decode(line).unwrap_err(),
            CodecError::FieldCount {
                expected: COURSE_FIELDS,
                found
            }
        );
    }

    #[test]
    fn given_empty_code_when_decoding_then_rejects() {
        let err = CourseCodec.decode(" |CS101|Intro|Spring|2024|30|12|450").unwrap_err();
        assert_eq!(err, CodecError::EmptyKey);
    }

    #[rstest]
    #[case("CS101|CS101|Intro|Spring|2024|many|12|450", "seats")]
    #[case("CS101|CS101|Intro|Spring|2024|30|-1|450", "registered")]
    #[case("CS101|CS101|Intro|Spring|2024|30|12|free", "price")]
    fn given_bad_number_when_decoding_then_names_field(#[case] line: &str, #[case] field: &str) {
        match CourseCodec.decode(line).unwrap_err() {
            CodecError::InvalidNumber { field: actual, .. } => assert_eq!(actual, field),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn given_course_when_encoding_then_decodes_to_same_course() {
        let course = CourseCodec.decode(LINE).unwrap();
        let encoded = CourseCodec.encode(&course);
        assert_eq!(encoded, LINE);
        assert_eq!(CourseCodec.decode(&encoded).unwrap(), course);
    }
}
