//! Descriptor linting - static analysis of descriptor files.
//!
//! Checks descriptor files for:
//! - JSON syntax errors
//! - Descriptor schema violations
//! - Invalid entries (bad URIs, patterns, hints)
//! - Conflicting resource links for one relation type
//! - Unresolvable documentation and undocumented relation types

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::assembler::Assembler;
use crate::loader::{join_uri, DescriptorSet};
use crate::resolver::{DocSource, DocsResolver, Unresolved};
use crate::types::GeneratorOptions;
use crate::validator::schema_errors;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/resources/0/hints")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, options: &GeneratorOptions, strict: bool) -> LintResult {
    let files = collect_descriptor_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path, options);
        total_errors += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        total_warnings += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single descriptor file.
pub fn lint_file(file: &Path, base_path: &Path, options: &GeneratorOptions) -> FileResult {
    let mut diagnostics = Diagnostics {
        file,
        items: Vec::new(),
    };
    check_file(file, options, &mut diagnostics);
    let diagnostics = diagnostics.items;

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

struct Diagnostics<'a> {
    file: &'a Path,
    items: Vec<Diagnostic>,
}

impl Diagnostics<'_> {
    fn push(&mut self, severity: Severity, code: &str, path: String, message: String) {
        self.items.push(Diagnostic {
            severity,
            code: code.to_string(),
            file: self.file.to_path_buf(),
            path,
            message,
        });
    }

    fn error(&mut self, code: &str, path: String, message: String) {
        self.push(Severity::Error, code, path, message);
    }

    fn warning(&mut self, code: &str, path: String, message: String) {
        self.push(Severity::Warning, code, path, message);
    }
}

fn check_file(file: &Path, options: &GeneratorOptions, diagnostics: &mut Diagnostics<'_>) {
    let parsed = std::fs::read_to_string(file)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));
    let document = match parsed {
        Ok(document) => document,
        Err(e) => {
            diagnostics.error("E001", "/".to_string(), format!("syntax error: {}", e));
            return;
        }
    };

    let violations = schema_errors(&document);
    if !violations.is_empty() {
        for violation in violations {
            diagnostics.error("E002", violation.path, violation.message);
        }
        return;
    }

    let set: DescriptorSet = match serde_json::from_value(document) {
        Ok(set) => set,
        Err(e) => {
            diagnostics.error("E002", "/".to_string(), e.to_string());
            return;
        }
    };

    let resolver = DocsResolver::from_options(options);
    let mut assembler = Assembler::new();
    let mut first_seen: HashMap<Url, usize> = HashMap::new();

    for (i, entry) in set.resources.into_iter().enumerate() {
        let entry_path = format!("/resources/{}", i);
        check_docs(
            &resolver,
            options,
            &entry.rel,
            entry.doc.as_ref(),
            &format!("{}/doc", entry_path),
            diagnostics,
        );
        for (name, var) in &entry.href_vars {
            check_docs(
                &resolver,
                options,
                &entry.rel,
                var.doc.as_ref(),
                &format!("{}/href-vars/{}/doc", entry_path, name),
                diagnostics,
            );
        }

        let descriptor = match entry.into_descriptor(options, &resolver) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                diagnostics.error("E003", entry_path, e.to_string());
                continue;
            }
        };

        first_seen.entry(descriptor.relation_type.clone()).or_insert(i);
        if let Err(e) = assembler.add(descriptor) {
            diagnostics.error("E004", entry_path, e.to_string());
        }
    }

    for link in assembler.finish().iter() {
        if link.hints().docs().is_empty() {
            let index = first_seen.get(link.relation_type()).copied().unwrap_or_default();
            diagnostics.warning(
                "W002",
                format!("/resources/{}", index),
                format!("relation type {} has no documentation", link.relation_type()),
            );
        }
    }
}

/// Report documentation that would silently degrade during generation.
fn check_docs(
    resolver: &DocsResolver,
    options: &GeneratorOptions,
    rel: &str,
    doc: Option<&DocSource>,
    path: &str,
    diagnostics: &mut Diagnostics<'_>,
) {
    let Some(doc) = doc else {
        return;
    };
    // Unparseable relation types are reported by the descriptor check.
    let Ok(relation_type) = join_uri(&options.relation_type_base_uri, rel) else {
        return;
    };

    for unresolved in resolver.resolve(&relation_type, doc).unresolved {
        match unresolved {
            Unresolved::Include { path: include } => diagnostics.warning(
                "W001",
                format!("{}/include", path),
                format!("markdown include not found: {}", include),
            ),
            Unresolved::Link { link, reason } => diagnostics.warning(
                "W001",
                format!("{}/link", path),
                format!("unresolvable doc link {}: {}", link, reason),
            ),
        }
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_descriptor_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
