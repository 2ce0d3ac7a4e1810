//! Saved course listing

use anyhow::Result;

use super::output::Output;
use crate::storage::CourseLibrary;

pub fn list(output: &Output, library: &CourseLibrary) -> Result<()> {
    let files = library.list()?;
    output.verbose_ctx(
        "courses",
        &format!("Found {} file(s) in {}", files.len(), library.root().display()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({ "files": files }));
    } else if files.is_empty() {
        println!("No saved statement lists in {}", library.root().display());
    } else {
        for file in &files {
            println!("{}", file);
        }
    }

    Ok(())
}
