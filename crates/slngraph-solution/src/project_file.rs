//! MSBuild project-file parsing.
//!
//! Only three things are read from a project file:
//!
//! - the SDK (`<Project Sdk="...">` or a nested `<Sdk Name="..."/>`),
//! - the target frameworks (`<TargetFramework>` and the `;`-separated
//!   `<TargetFrameworks>`),
//! - every `<ProjectReference Include="...">`, with its optional `<Name>`
//!   and `<Project>` (GUID) children.
//!
//! Namespaces are ignored, so both legacy (`xmlns=".../msbuild/2003"`) and
//! SDK-style files parse the same way.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::SolutionError;
use crate::project_types::normalize_guid;

/// One `<ProjectReference>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFileReference {
    /// Referenced project name: `<Name>` if present, else the file stem of
    /// the include path.
    pub name: String,
    /// The raw `Include` attribute.
    pub include: String,
    /// Normalized `<Project>` GUID, when declared.
    pub project_id: Option<String>,
}

impl ProjectFileReference {
    fn new(include: String, name: Option<String>, project_id: Option<String>) -> Self {
        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| file_stem(&include).to_string());
        Self {
            name,
            include,
            project_id,
        }
    }
}

/// File stem of a path written with either separator.
fn file_stem(include: &str) -> &str {
    let file = include.rsplit(['\\', '/']).next().unwrap_or(include);
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}

/// The parts of a project file the dependency graph needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    pub sdk: Option<String>,
    /// Target frameworks in declaration order, without duplicates.
    pub frameworks: Vec<String>,
    /// Project references in declaration order.
    pub references: Vec<ProjectFileReference>,
}

/// Element whose text content is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Frameworks,
    ReferenceName,
    ReferenceProject,
}

#[derive(Debug, Default)]
struct PendingReference {
    include: String,
    name: Option<String>,
    project_id: Option<String>,
}

impl ProjectFile {
    /// Read and parse a project file.
    ///
    /// # Errors
    ///
    /// [`SolutionError::Io`] if the file cannot be read and
    /// [`SolutionError::Xml`] if it is not well-formed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SolutionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = Self::parse(path, &text)?;
        debug!(
            references = parsed.references.len(),
            frameworks = parsed.frameworks.len(),
            "parsed project file"
        );
        Ok(parsed)
    }

    /// Parse project-file XML. `path` is used only for error messages.
    ///
    /// # Errors
    ///
    /// [`SolutionError::Xml`] on malformed XML.
    pub fn parse(path: impl AsRef<Path>, xml: &str) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        let xml_error = |source: quick_xml::Error| SolutionError::Xml {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut project = Self::default();
        let mut stack: Vec<String> = Vec::new();
        let mut pending: Option<PendingReference> = None;
        let mut capture: Option<Capture> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(element) => {
                    let name = local_name(&element);
                    capture = project
                        .open_element(&element, &name, &stack, &mut pending)
                        .map_err(xml_error)?;
                    stack.push(name);
                }
                Event::Empty(element) => {
                    let name = local_name(&element);
                    project
                        .open_element(&element, &name, &stack, &mut pending)
                        .map_err(xml_error)?;
                    project.close_element(&name, &mut pending);
                }
                Event::End(_) => {
                    capture = None;
                    if let Some(name) = stack.pop() {
                        project.close_element(&name, &mut pending);
                    }
                }
                Event::Text(text) => {
                    let Some(target) = capture else {
                        continue;
                    };
                    let text = text.unescape().map_err(xml_error)?;
                    project.capture_text(target, text.trim(), &mut pending);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(project)
    }

    /// Handle an opening tag; returns what its text content should feed.
    fn open_element(
        &mut self,
        element: &BytesStart<'_>,
        name: &str,
        stack: &[String],
        pending: &mut Option<PendingReference>,
    ) -> Result<Option<Capture>, quick_xml::Error> {
        let parent = stack.last().map(String::as_str);
        match (name, parent) {
            ("Project", None) => {
                self.sdk = attribute(element, "Sdk")?.filter(|sdk| !sdk.is_empty());
                Ok(None)
            }
            ("Sdk", Some("Project")) => {
                if self.sdk.is_none() {
                    self.sdk = attribute(element, "Name")?;
                }
                Ok(None)
            }
            ("TargetFramework" | "TargetFrameworks", _) => Ok(Some(Capture::Frameworks)),
            ("ProjectReference", _) => {
                *pending = Some(PendingReference {
                    include: attribute(element, "Include")?.unwrap_or_default(),
                    ..PendingReference::default()
                });
                Ok(None)
            }
            ("Name", Some("ProjectReference")) => Ok(Some(Capture::ReferenceName)),
            ("Project", Some("ProjectReference")) => Ok(Some(Capture::ReferenceProject)),
            _ => Ok(None),
        }
    }

    fn close_element(&mut self, name: &str, pending: &mut Option<PendingReference>) {
        if name != "ProjectReference" {
            return;
        }
        if let Some(reference) = pending.take() {
            self.references.push(ProjectFileReference::new(
                reference.include,
                reference.name,
                reference.project_id,
            ));
        }
    }

    fn capture_text(&mut self, target: Capture, text: &str, pending: &mut Option<PendingReference>) {
        match target {
            Capture::Frameworks => {
                for framework in text.split(';').map(str::trim).filter(|f| !f.is_empty()) {
                    if !self.frameworks.iter().any(|known| known == framework) {
                        self.frameworks.push(framework.to_string());
                    }
                }
            }
            Capture::ReferenceName => {
                if let Some(reference) = pending.as_mut() {
                    reference.name = Some(text.to_string());
                }
            }
            Capture::ReferenceProject => {
                if let Some(reference) = pending.as_mut() {
                    reference.project_id = normalize_guid(text);
                }
            }
        }
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, quick_xml::Error> {
    match element.try_get_attribute(key)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.trim().to_string())),
        None => Ok(None),
    }
}
