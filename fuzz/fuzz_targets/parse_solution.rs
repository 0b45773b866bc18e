#![no_main]

use libfuzzer_sys::fuzz_target;
use slngraph_solution::SolutionInfo;

// Parsing must never panic; when it succeeds, the folder tree and every
// tree path must be computable too.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(info) = SolutionInfo::parse("fuzz.sln", text) else {
        return;
    };
    let _ = slngraph_solution::solution_tree(&info);
    for project in info.projects() {
        let _ = info.tree_path(project);
    }
});
