//! Password strength analyzer - scores a password from 0 to 5.

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::sections::{
    digit_section, length_section, lowercase_section, special_section, uppercase_section,
    SectionResult,
};

/// Strength bucket for a score, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthLevel {
    /// Nothing typed yet, or nothing met.
    Empty,
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => StrengthLevel::Empty,
            1 => StrengthLevel::VeryWeak,
            2 => StrengthLevel::Weak,
            3 => StrengthLevel::Fair,
            4 => StrengthLevel::Good,
            _ => StrengthLevel::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::Empty => "",
            StrengthLevel::VeryWeak => "Very Weak",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            StrengthLevel::Empty => Severity::None,
            StrengthLevel::VeryWeak => Severity::Critical,
            StrengthLevel::Weak => Severity::High,
            StrengthLevel::Fair => Severity::Medium,
            StrengthLevel::Good => Severity::Low,
            StrengthLevel::Strong => Severity::Ok,
        }
    }
}

/// Meter colour for a level, gray (`None`) through red (`Critical`) to green (`Ok`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    None,
    Critical,
    High,
    Medium,
    Low,
    Ok,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Ok => "ok",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrengthResult {
    /// Number of criteria met, 0..=5.
    pub score: u8,
    pub label: &'static str,
    pub level: StrengthLevel,
    pub severity: Severity,
    /// Hints for the criteria not met, in check order.
    pub missing: Vec<&'static str>,
}

/// Scores `password` one point per criterion met: length of at least 8,
/// an uppercase letter, a lowercase letter, a digit, a non-alphanumeric
/// character.
pub fn score_password(password: &str) -> PasswordStrengthResult {
    let sections: [fn(&str) -> SectionResult; 5] = [
        length_section,
        uppercase_section,
        lowercase_section,
        digit_section,
        special_section,
    ];

    let mut score = 0u8;
    let mut missing = Vec::new();
    for section_fn in sections {
        match section_fn(password) {
            None => score += 1,
            Some(hint) => missing.push(hint),
        }
    }

    let level = StrengthLevel::from_score(score);
    PasswordStrengthResult {
        score,
        label: level.label(),
        level,
        severity: level.severity(),
        missing,
    }
}

/// Scores a password held as a secret.
pub fn evaluate_password_strength(password: &SecretString) -> PasswordStrengthResult {
    score_password(password.expose_secret())
}

/// Debounced scoring for live meters: waits 300ms, then sends the result
/// unless `token` was cancelled in the meantime (the user kept typing).
#[cfg(feature = "async")]
pub async fn score_password_tx(
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<PasswordStrengthResult>,
) {
    use std::time::Duration;

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("strength scoring superseded");
            return;
        }
        _ = tokio::time::sleep(Duration::from_millis(300)) => {}
    }

    let result = evaluate_password_strength(password);

    if tx.send(result).await.is_err() {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password strength result: receiver dropped");
    }
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_score_password_tx_sends_after_debounce() {
        let (tx, mut rx) = mpsc::channel(1);
        let pwd = SecretString::new("TestPass123!".to_string().into());

        score_password_tx(&pwd, CancellationToken::new(), tx).await;

        let result = rx.recv().await.expect("Should receive result");
        assert_eq!(result.score, 5);
        assert_eq!(result.label, "Strong");
    }

    #[tokio::test(start_paused = true)]
    async fn test_score_password_tx_cancelled() {
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        let pwd = SecretString::new("TestPass123!".to_string().into());
        score_password_tx(&pwd, token, tx).await;

        assert!(rx.recv().await.is_none(), "sender dropped without a result");
    }
}
