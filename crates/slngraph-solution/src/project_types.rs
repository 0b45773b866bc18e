//! Well-known solution project type GUIDs.
//!
//! GUIDs are kept in normalized form: lowercase, hyphenated, no braces (see
//! [`normalize_guid`]).

pub const SOLUTION_FOLDER: &str = "2150e333-8fdc-42a3-9474-1a3956d46de8";
pub const CSHARP_PROJECT: &str = "fae04ec0-301f-11d3-bf4b-00c04f79efbc";
pub const CSHARP_SDK_PROJECT: &str = "9a19103f-16f7-4668-be54-9a1e7a4f7556";
pub const FSHARP_PROJECT: &str = "f2a71f9b-5d33-465a-a702-920d77279786";
pub const FSHARP_SDK_PROJECT: &str = "6ec3ee1d-3c4e-46dd-8f32-0cc8e7565705";
pub const VB_PROJECT: &str = "f184b08f-c81c-45f6-a57f-5abd9991f28f";
pub const VB_SDK_PROJECT: &str = "778dae3c-4631-46ea-aa77-85c1314464d9";
pub const SETUP_PROJECT: &str = "54435603-dbb4-11d2-8724-00a0c9a8b90c";
pub const CPP_PROJECT: &str = "8bc9ceb8-8b4a-11d0-8d11-00a0c91bc942";

const REGISTRY: [(&str, &str); 9] = [
    (SOLUTION_FOLDER, "Solution Folder"),
    (CSHARP_PROJECT, "C# Project"),
    (CSHARP_SDK_PROJECT, "C# Project"),
    (FSHARP_PROJECT, "F# Project"),
    (FSHARP_SDK_PROJECT, "F# Project"),
    (VB_PROJECT, "VB Project"),
    (VB_SDK_PROJECT, "VB Project"),
    (SETUP_PROJECT, "Setup Project"),
    (CPP_PROJECT, "C++ Project"),
];

/// Friendly name for a project type GUID, or `ProjectType(<guid>)`.
#[must_use]
pub fn project_type_name(type_id: &str) -> String {
    REGISTRY
        .iter()
        .find(|(guid, _)| *guid == type_id)
        .map_or_else(|| format!("ProjectType({type_id})"), |(_, name)| (*name).to_string())
}

/// Whether entries of this type never have a project file to load.
#[must_use]
pub fn is_container_type(type_id: &str) -> bool {
    type_id == SOLUTION_FOLDER || type_id == SETUP_PROJECT
}

/// Normalize GUID text: strip quotes and braces, lowercase.
///
/// Returns `None` unless the result is a hyphenated 8-4-4-4-12 hex GUID.
#[must_use]
pub fn normalize_guid(text: &str) -> Option<String> {
    let trimmed = text
        .trim()
        .trim_matches('"')
        .trim_start_matches('{')
        .trim_end_matches('}');
    let guid = trimmed.to_ascii_lowercase();

    let groups: Vec<&str> = guid.split('-').collect();
    let lengths = [8, 4, 4, 4, 12];
    let well_formed = groups.len() == lengths.len()
        && groups
            .iter()
            .zip(lengths)
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()));
    well_formed.then_some(guid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_names() {
        assert_eq!(project_type_name(SOLUTION_FOLDER), "Solution Folder");
        assert_eq!(project_type_name(CSHARP_SDK_PROJECT), "C# Project");
        assert_eq!(project_type_name(CPP_PROJECT), "C++ Project");
    }

    #[test]
    fn unknown_type_is_wrapped() {
        let id = "00000000-0000-0000-0000-000000000001";
        assert_eq!(project_type_name(id), format!("ProjectType({id})"));
    }

    #[test]
    fn folders_and_setup_are_containers() {
        assert!(is_container_type(SOLUTION_FOLDER));
        assert!(is_container_type(SETUP_PROJECT));
        assert!(!is_container_type(CSHARP_PROJECT));
    }

    #[test]
    fn guid_normalization() {
        assert_eq!(
            normalize_guid("\"{54435603-DBB4-11D2-8724-00A0C9A8B90C}\"").as_deref(),
            Some(SETUP_PROJECT)
        );
        assert_eq!(
            normalize_guid(" {FAE04EC0-301F-11D3-BF4B-00C04F79EFBC} ").as_deref(),
            Some(CSHARP_PROJECT)
        );
        assert!(normalize_guid("{not-a-guid}").is_none());
        assert!(normalize_guid("fae04ec0301f11d3bf4b00c04f79efbc").is_none());
    }
}
