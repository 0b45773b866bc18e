#![no_main]

use libfuzzer_sys::fuzz_target;
use slngraph_core::{DependencyGraph, ProjectRecord, ProjectReference};
use slngraph_solution::ProjectFile;

// Any parsed project file must feed the graph builder without panicking,
// including self-references and dangling names.
fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(project) = ProjectFile::parse("fuzz.csproj", xml) else {
        return;
    };

    let mut record = ProjectRecord::new("Fuzz", "fuzz.csproj");
    for reference in &project.references {
        record = record.with_reference(ProjectReference::new(&reference.name, &reference.include));
    }
    if let Ok(graph) = DependencyGraph::from_records([record]) {
        let _ = graph.topologically_sorted();
        let _ = graph.find_pure_dependencies("Fuzz");
    }
});
