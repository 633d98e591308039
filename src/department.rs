use std::fmt;

use chrono::naive::{NaiveDate, NaiveDateTime};
use chrono::prelude::*;
use serde::Serialize;

/// One row of the `dept` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    deptno: i64,
    dname: String,
    loc: String,
    updated_at: NaiveDateTime,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dept. #{}: {}, {} (updated {})",
            self.deptno,
            self.dname,
            self.loc,
            format_date_us(&self.updated_at.date())
        )
    }
}

impl Department {
    /// Create a department stamped with the current local time.  Name and location are trimmed.
    pub fn new(deptno: i64, dname: &str, loc: &str) -> Self {
        Department::with_timestamp(deptno, dname, loc, Local::now().naive_local())
    }

    pub fn with_timestamp(deptno: i64, dname: &str, loc: &str, updated_at: NaiveDateTime) -> Self {
        Department {
            deptno,
            dname: String::from(dname.trim()),
            loc: String::from(loc.trim()),
            updated_at,
        }
    }

    pub fn deptno(&self) -> i64 {
        self.deptno
    }

    pub fn name(&self) -> &String {
        &self.dname
    }

    pub fn location(&self) -> &String {
        &self.loc
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Check the fields the store refuses to persist.  Returns the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.deptno <= 0 {
            return Err(format!("department number must be positive, got {}", self.deptno));
        }

        if self.dname.is_empty() {
            return Err(String::from("department name is required"));
        }

        Ok(())
    }
}

pub fn format_date_us(date: &NaiveDate) -> String {
    let date_format = date.format("%m/%d/%Y");
    format!("{}", date_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 4, 7)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn display_uses_us_date() {
        let dept = Department::with_timestamp(10, "ACCOUNTING", "NEW YORK", stamp());
        assert_eq!(dept.to_string(), "Dept. #10: ACCOUNTING, NEW YORK (updated 04/07/2019)");
    }

    #[test]
    fn new_trims_fields() {
        let dept = Department::new(20, "  RESEARCH ", " DALLAS\n");
        assert_eq!(dept.name(), "RESEARCH");
        assert_eq!(dept.location(), "DALLAS");
    }

    #[test]
    fn validate_rejects_bad_number_and_blank_name() {
        assert!(Department::with_timestamp(0, "SALES", "", stamp()).validate().is_err());
        assert!(Department::with_timestamp(-3, "SALES", "", stamp()).validate().is_err());
        assert!(Department::with_timestamp(30, "   ", "CHICAGO", stamp()).validate().is_err());
        assert!(Department::with_timestamp(30, "SALES", "", stamp()).validate().is_ok());
    }

    #[test]
    fn serializes_to_json() {
        let dept = Department::with_timestamp(40, "OPERATIONS", "BOSTON", stamp());
        let json = serde_json::to_value(&dept).unwrap();
        assert_eq!(json["deptno"], 40);
        assert_eq!(json["dname"], "OPERATIONS");
        assert_eq!(json["updated_at"], "2019-04-07T09:30:00");
    }
}
