//! Upload validation and file access rules.
//!
//! An upload is accepted only when its declared MIME type is on the
//! whitelist, its extension is one listed for that type, it fits under the
//! configured size limit, and its name carries neither a second extension
//! nor a NUL byte. Every failed rule is reported, not just the first.
//!
//! Accepted files are stored under their uploader's role (or `public`) with a
//! generated name, so nothing the client chose reaches the filesystem except
//! a sanitized stem.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::roles::{Action, Role, UnknownRole};

/// Default upload size limit: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

const STEM_LIMIT: usize = 50;

/// MIME types accepted for upload, each with its permitted extensions. The
/// first extension is the one given to stored files.
pub const ALLOWED_TYPES: [(&str, &[&str]); 10] = [
    ("image/jpeg", &[".jpg", ".jpeg"]),
    ("image/png", &[".png"]),
    ("image/gif", &[".gif"]),
    ("audio/mpeg", &[".mp3"]),
    ("audio/wav", &[".wav"]),
    ("audio/ogg", &[".ogg"]),
    ("application/pdf", &[".pdf"]),
    ("text/plain", &[".txt"]),
    ("video/mp4", &[".mp4"]),
    ("video/webm", &[".webm"]),
];

pub fn allowed_extensions(mime_type: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, exts)| *exts)
}

/// What the client sent: its file name, declared type, and byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadProblem {
    #[error("No file provided")]
    NoFile,

    #[error("File type {0} is not allowed")]
    TypeNotAllowed(String),

    #[error("File extension {0} does not match declared type")]
    ExtensionMismatch(String),

    #[error("File size exceeds maximum allowed size of {}MB", .0 / (1024 * 1024))]
    TooLarge(u64),

    #[error("Files with double extensions are not allowed")]
    DoubleExtension,

    #[error("Invalid filename characters detected")]
    NulInName,
}

/// Check `file` against every upload rule. An empty result means accepted.
pub fn validate_file(file: &UploadCandidate, max_bytes: u64) -> Vec<UploadProblem> {
    if file.original_name.is_empty() {
        return vec![UploadProblem::NoFile];
    }

    let mut problems = Vec::new();
    let allowed = allowed_extensions(&file.mime_type);
    if allowed.is_none() {
        problems.push(UploadProblem::TypeNotAllowed(file.mime_type.clone()));
    }

    let ext = extension(&file.original_name);
    if !allowed.is_some_and(|exts| exts.contains(&ext.as_str())) {
        problems.push(UploadProblem::ExtensionMismatch(ext));
    }

    if file.size > max_bytes {
        problems.push(UploadProblem::TooLarge(max_bytes));
    }

    if stem(&file.original_name).contains('.') {
        problems.push(UploadProblem::DoubleExtension);
    }

    if file.original_name.contains('\0') {
        problems.push(UploadProblem::NulInName);
    }

    problems
}

/// Lowercased extension with its dot, or empty. `.profile` has none.
fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// File name without directories and without its last extension.
fn stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name an accepted upload is stored under:
/// `<millis>_<32 hex>_<sanitized stem><ext for mime_type>`.
///
/// The stem keeps ASCII letters, digits, `_` and `-`; everything else becomes
/// `_`, and it is cut to 50 characters.
pub fn secure_filename(original_name: &str, mime_type: &str, now: DateTime<Utc>) -> String {
    let ext = allowed_extensions(mime_type)
        .and_then(|exts| exts.first())
        .copied()
        .unwrap_or("");
    let sanitized: String = stem(original_name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .take(STEM_LIMIT)
        .collect();
    format!(
        "{}_{}_{}{}",
        now.timestamp_millis(),
        Uuid::new_v4().simple(),
        sanitized,
        ext
    )
}

/// Where an upload lives: public material, or material owned by one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    Public,
    Owner(Role),
}

impl FileScope {
    /// Scope for a new upload by `role`.
    pub fn for_uploader(role: Option<Role>) -> Self {
        role.map_or(FileScope::Public, FileScope::Owner)
    }
}

impl fmt::Display for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileScope::Public => f.write_str("public"),
            FileScope::Owner(role) => write!(f, "{role}"),
        }
    }
}

impl FromStr for FileScope {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(FileScope::Public),
            other => other.parse().map(FileScope::Owner),
        }
    }
}

/// Admins reach every file, anyone reaches public files, and otherwise only
/// the owning role does.
pub fn can_access_file(requesting: Role, scope: FileScope) -> bool {
    match scope {
        FileScope::Public => true,
        FileScope::Owner(owner) => requesting == Role::Admin || requesting == owner,
    }
}

/// CLI entry point for `vault upload-check`.
pub fn run_upload_check(config: &Config, path: &Path, mime_type: &str, role: Role) -> anyhow::Result<()> {
    if !role.has_permission(Action::Upload, None) {
        anyhow::bail!("{} accounts do not have upload permissions", role);
    }

    let meta = std::fs::metadata(path)
        .with_context(|| format!("Failed to read upload: {}", path.display()))?;
    let candidate = UploadCandidate {
        original_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mime_type: mime_type.to_string(),
        size: meta.len(),
    };

    let problems = validate_file(&candidate, config.upload.max_bytes);
    if !problems.is_empty() {
        for problem in &problems {
            println!("  {}", problem);
        }
        tracing::warn!(file = %candidate.original_name, problems = problems.len(), "upload rejected");
        anyhow::bail!("upload rejected with {} problem(s)", problems.len());
    }

    let stored = secure_filename(&candidate.original_name, mime_type, Utc::now());
    println!("accepted: {}/{}", FileScope::for_uploader(Some(role)), stored);
    Ok(())
}
