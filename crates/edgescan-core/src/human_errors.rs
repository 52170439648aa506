// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scan failures.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents it.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it (retake the photo, adjust the corners).
    ActionRequired,
    /// Retrying the same input will not help.
    Permanent,
    /// Something on the device went wrong; trying again may work.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying again unchanged can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::EmptyInput => HumanError {
            message: "The picture is empty.".into(),
            suggestion: "Take the photo again or choose a different picture.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Decode(_) => HumanError {
            message: "We couldn't open that picture.".into(),
            suggestion: "Choose a JPEG or PNG photo of your document.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::InvalidDimensions { .. } => HumanError {
            message: "The picture has no visible content.".into(),
            suggestion: "Take the photo again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidCorners(_) | ScanError::DegenerateQuad { .. } => HumanError {
            message: "The corners don't outline a page.".into(),
            suggestion: "Drag the four corners onto the corners of your document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::ImageError(detail) => HumanError {
            message: "We couldn't save the scanned page.".into(),
            suggestion: format!("Try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Io(io) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: format!("Check the file location and free space, then try again. (Detail: {io})"),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Serialization(_) | ScanError::InvalidConfig(_) => HumanError {
            message: "The settings file is not valid.".into(),
            suggestion: "Fix or remove the settings file to use the defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Message for the routine case where no page outline was found.
pub fn humanize_no_detection() -> HumanError {
    HumanError {
        message: "We couldn't find the edges of your document.".into(),
        suggestion: "Place the page on a darker surface, or drag the corners into place yourself."
            .into(),
        retriable: true,
        severity: Severity::ActionRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_action_required() {
        let human = humanize_error(&ScanError::EmptyInput);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn decode_failure_is_permanent() {
        let human = humanize_error(&ScanError::Decode("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn degenerate_quad_asks_for_manual_corners() {
        let human = humanize_error(&ScanError::DegenerateQuad {
            width: 0,
            height: 12,
        });
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("corners"));
    }

    #[test]
    fn io_failure_is_transient() {
        let err = ScanError::Io(std::io::Error::other("disk full"));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.suggestion.contains("disk full"));
    }

    #[test]
    fn invalid_config_points_at_settings_file() {
        let human = humanize_error(&ScanError::InvalidConfig("blur_sigma must be > 0".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("settings"));
    }

    #[test]
    fn no_detection_offers_manual_fallback() {
        let human = humanize_no_detection();
        assert!(human.retriable);
        assert!(human.suggestion.contains("corners"));
    }
}
