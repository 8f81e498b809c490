//! Test utilities for the commerce API suites.
//!
//! This crate produces the synthetic customers the suites register, and the
//! run context used to tag them so leftover accounts on the remote platform
//! can be traced back to the run that created them.

use chrono::Utc;
use commerce_client::UserRecord;
use fake::Fake;
use fake::faker::internet::en::{FreeEmailProvider, Password};
use fake::faker::name::en::{FirstName, LastName};
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

/// Suffix appended to every generated password so it always mixes upper and
/// lower case letters, digits and symbols.
const PASSWORD_SUFFIX: &str = "Aa1!";

/// Longest run context embedded in an email address.
const MAX_CONTEXT_LEN: usize = 12;

/// Longest email local part accepted by RFC 5321.
const MAX_LOCAL_PART_LEN: usize = 64;

/// Number of random hex characters closing each uniqueness tag.
const RANDOM_SUFFIX_LEN: usize = 4;

/// Per-process sequence number of generated users.
static USER_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Extract the CI run context from the GitHub Actions environment.
///
/// Returns:
/// - `pr{number}` for pull request workflows (e.g., "pr123")
/// - `main` for pushes to main/master branch
/// - the branch name with `/` replaced by `-` for other branch pushes
/// - `local` when `GITHUB_REF` is unset or unrecognised
pub fn get_run_context() -> String {
    let Ok(github_ref) = env::var("GITHUB_REF") else {
        return "local".to_string();
    };

    if let Some(rest) = github_ref.strip_prefix("refs/pull/") {
        if let Some(number) = rest.split('/').next().filter(|n| !n.is_empty()) {
            return format!("pr{}", number);
        }
    } else if let Some(branch) = github_ref.strip_prefix("refs/heads/") {
        return match branch {
            "main" | "master" => "main".to_string(),
            other => other.replace('/', "-"),
        };
    }

    "local".to_string()
}

/// Build a tag that makes a generated email unique.
///
/// Format: `{context}-{timestamp}-{sequence}{random}`, where the timestamp is
/// `yyyymmddHHMMSS` in UTC, the sequence is a per-process counter and the
/// random part is taken from a v4 UUID. The counter rules out collisions
/// within one process; timestamp and random part cover parallel processes.
///
/// # Examples
///
/// ```
/// use test_utils::unique_tag;
///
/// let first = unique_tag();
/// let second = unique_tag();
/// assert_ne!(first, second);
/// ```
pub fn unique_tag() -> String {
    let context = sanitize_context(&get_run_context());
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let sequence = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = &Uuid::new_v4().simple().to_string()[..RANDOM_SUFFIX_LEN];

    format!("{}-{}-{}{}", context, timestamp, sequence, random)
}

/// Generate a random customer record.
///
/// - `firstname` and `lastname` are English names.
/// - `email` is `{first}.{last}+{tag}@{provider}` in lower case, where `tag`
///   comes from [`unique_tag`] and `provider` is a free email domain.
/// - `password` is 10 to 15 random characters followed by a fixed suffix
///   that guarantees mixed character classes.
///
/// Callers may overwrite any field afterwards to test validation.
///
/// # Examples
///
/// ```
/// use test_utils::generate_random_user;
///
/// let user = generate_random_user();
/// assert_eq!(user.email, user.email.to_lowercase());
/// assert_eq!(user.email.matches('@').count(), 1);
/// assert!(!user.firstname.is_empty());
/// ```
pub fn generate_random_user() -> UserRecord {
    let firstname: String = FirstName().fake();
    let lastname: String = LastName().fake();
    let provider: String = FreeEmailProvider().fake();
    let random_password: String = Password(10..16).fake();

    let email = build_email(&firstname, &lastname, &unique_tag(), &provider);
    debug!(email = %email, "Generated random user");

    UserRecord {
        email,
        firstname,
        lastname,
        password: format!("{}{}", random_password, PASSWORD_SUFFIX),
    }
}

/// Assemble a lower-case email address from name parts, tag and domain.
///
/// Name parts are reduced to ASCII alphanumerics; if nothing remains the
/// local part falls back to `user`. The tag is always kept whole and the
/// name part is shortened so the local part never exceeds
/// [`MAX_LOCAL_PART_LEN`] characters.
fn build_email(firstname: &str, lastname: &str, tag: &str, provider: &str) -> String {
    let name_parts: Vec<String> = [firstname, lastname]
        .iter()
        .map(|part| {
            part.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect();

    let joined = if name_parts.is_empty() {
        "user".to_string()
    } else {
        name_parts.join(".")
    };

    // One character is taken by the `+` separator.
    let name_budget = MAX_LOCAL_PART_LEN.saturating_sub(tag.len() + 1).max(1);
    let truncated: String = joined.chars().take(name_budget).collect();
    let local = match truncated.trim_end_matches('.') {
        "" => "u",
        name => name,
    };

    format!("{}+{}@{}", local, tag, provider).to_lowercase()
}

/// Restrict a run context to characters that are safe in an email local part.
fn sanitize_context(context: &str) -> String {
    let sanitized: String = context
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_CONTEXT_LEN)
        .collect();
    let trimmed = sanitized.trim_matches('-');

    if trimmed.is_empty() {
        "local".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
