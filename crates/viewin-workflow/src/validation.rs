// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input rules for job report submission.

use std::sync::LazyLock;

use regex::Regex;
use viewin_core::ViewinError;

use crate::events::CreateJobReport;

pub const COMPANY_MAX_CHARS: usize = 100;
pub const TITLE_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MIN_CHARS: usize = 50;

/// Letters (Latin-1 accents included), digits, space, and `.,&-`.
static COMPANY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\u{00C0}-\u{00FF}0-9 .,&-]+$").unwrap());

fn require(field: &str, value: &str) -> Result<(), ViewinError> {
    if value.trim().is_empty() {
        return Err(ViewinError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Checks a submission before anything is persisted.
pub fn validate_job_report(input: &CreateJobReport) -> Result<(), ViewinError> {
    require("company", &input.company)?;
    require("title", &input.title)?;
    require("description", &input.description)?;

    let company = input.company.trim();
    if company.chars().count() > COMPANY_MAX_CHARS {
        return Err(ViewinError::Validation(format!(
            "company must be at most {COMPANY_MAX_CHARS} characters"
        )));
    }
    if !COMPANY_PATTERN.is_match(company) {
        return Err(ViewinError::Validation(
            "company may only contain letters, digits, spaces, and . , & -".into(),
        ));
    }
    if input.title.trim().chars().count() > TITLE_MAX_CHARS {
        return Err(ViewinError::Validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    if input.description.trim().chars().count() < DESCRIPTION_MIN_CHARS {
        return Err(ViewinError::Validation(format!(
            "description must be at least {DESCRIPTION_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

/// Rejects values that would escape their key segment.
pub fn validate_key_segment(field: &str, value: &str) -> Result<(), ViewinError> {
    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(ViewinError::Validation(format!(
            "{field} must not contain path separators or `..`"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(company: &str, title: &str, description: &str) -> CreateJobReport {
        CreateJobReport {
            company: company.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    const DESCRIPTION: &str = "Responsible for designing, building and operating backend services.";

    #[test]
    fn accepts_reasonable_input() {
        assert!(validate_job_report(&input("Acme", "Dev", DESCRIPTION)).is_ok());
        assert!(validate_job_report(&input("São Paulo Tech & Co.", "Dev", DESCRIPTION)).is_ok());
    }

    #[test]
    fn rejects_blank_fields() {
        for bad in [
            input(" ", "Dev", DESCRIPTION),
            input("Acme", "", DESCRIPTION),
            input("Acme", "Dev", "   "),
        ] {
            assert!(matches!(validate_job_report(&bad), Err(ViewinError::Validation(_))));
        }
    }

    #[test]
    fn enforces_length_bounds() {
        let long_company = "A".repeat(COMPANY_MAX_CHARS + 1);
        assert!(validate_job_report(&input(&long_company, "Dev", DESCRIPTION)).is_err());

        let long_title = "T".repeat(TITLE_MAX_CHARS + 1);
        assert!(validate_job_report(&input("Acme", &long_title, DESCRIPTION)).is_err());

        assert!(validate_job_report(&input("Acme", "Dev", "too short")).is_err());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let accented = "É".repeat(COMPANY_MAX_CHARS);
        assert!(validate_job_report(&input(&accented, "Dev", DESCRIPTION)).is_ok());
    }

    #[test]
    fn rejects_company_symbols() {
        assert!(validate_job_report(&input("Acme <script>", "Dev", DESCRIPTION)).is_err());
    }

    #[test]
    fn key_segments_cannot_traverse() {
        assert!(validate_key_segment("filename", "answer_1.mp3").is_ok());
        assert!(validate_key_segment("filename", "../etc").is_err());
        assert!(validate_key_segment("filename", "a/b.mp3").is_err());
    }
}
