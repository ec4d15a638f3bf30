//! Microphone permission states and the prompt shown after a denial.

use std::str::FromStr;

use serde::Serialize;

use crate::localization::LocalizationManager;

/// Microphone permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordPermission {
    Undetermined,
    Denied,
    Granted,
}

impl FromStr for RecordPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "undetermined" => Ok(RecordPermission::Undetermined),
            "denied" => Ok(RecordPermission::Denied),
            "granted" => Ok(RecordPermission::Granted),
            other => Err(format!("Unknown record permission: {}", other)),
        }
    }
}

/// Platform permission service.
pub trait PermissionGate {
    fn status(&self) -> RecordPermission;

    /// Asks the user once; returns whether access was granted.
    fn request_access(&mut self) -> bool;
}

/// Permission gate with a fixed status and a scripted answer to the request dialog.
#[derive(Debug, Clone)]
pub struct StaticPermissionGate {
    status: RecordPermission,
    grant_on_request: bool,
    requests: u32,
}

impl StaticPermissionGate {
    pub fn new(status: RecordPermission) -> Self {
        Self {
            status,
            grant_on_request: true,
            requests: 0,
        }
    }

    /// Answer given when the status is undetermined and access is requested.
    pub fn answering(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl PermissionGate for StaticPermissionGate {
    fn status(&self) -> RecordPermission {
        self.status
    }

    fn request_access(&mut self) -> bool {
        self.requests += 1;
        if self.status == RecordPermission::Undetermined {
            self.status = if self.grant_on_request {
                RecordPermission::Granted
            } else {
                RecordPermission::Denied
            };
        }
        self.status == RecordPermission::Granted
    }
}

/// Actions offered by the microphone-denied prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PromptAction {
    OpenSettings,
    Cancel,
}

/// A blocking prompt the UI must present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionPrompt {
    pub title: String,
    pub message: String,
    pub actions: Vec<(PromptAction, String)>,
}

impl PermissionPrompt {
    /// Prompt offering to open the system settings after microphone access was denied.
    pub fn microphone_denied(localization: &LocalizationManager, language: &str) -> Self {
        Self {
            title: localization.get_message_in_language("microphone-denied-title", language, None),
            message: localization.get_message_in_language(
                "microphone-denied-message",
                language,
                None,
            ),
            actions: vec![
                (
                    PromptAction::OpenSettings,
                    localization.get_message_in_language("action-open-settings", language, None),
                ),
                (
                    PromptAction::Cancel,
                    localization.get_message_in_language("action-cancel", language, None),
                ),
            ],
        }
    }
}
