//! The `hafalan init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("hafalan.toml").exists() {
        println!("hafalan.toml already exists, skipping.");
    } else {
        std::fs::write("hafalan.toml", SAMPLE_CONFIG)?;
        println!("Created hafalan.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit hafalan.toml: pick a store and set your owner_id");
    println!("  2. Run: hafalan stats");
    println!("  3. Run: hafalan quiz --from indonesian --to english");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# hafalan configuration

# The user whose vocabulary and notes are practiced.
owner_id = 1

# Quiz defaults, overridable per run.
max_questions = 40
include_mastered = false

# Local JSON file (works offline).
[store]
type = "file"
path = "hafalan-data.json"

# Or a PostgREST / Supabase backend:
# [store]
# type = "postgrest"
# url = "https://your-project.supabase.co"
# api_key = "${HAFALAN_API_KEY}"
"#;
