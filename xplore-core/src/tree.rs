//! Depth-bounded directory tree rendering

use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// Render a depth-bounded listing of `root` for diagnostics.
///
/// Directories sort before files, alphabetically within each group.
/// Recursion descends only while the current depth is strictly below
/// `max_depth`; entries past the bound are simply not shown.
///
/// Unreadable directories are skipped silently. This is a best-effort
/// listing, not a completeness guarantee.
pub fn render_tree(root: &Path, max_depth: usize) -> String {
    let mut out = String::new();
    walk(root, "", 0, max_depth, &mut out);
    out
}

fn walk(dir: &Path, prefix: &str, depth: usize, max_depth: usize, out: &mut String) {
    let Ok(read) = fs::read_dir(dir) else {
        return;
    };

    let mut entries: Vec<(bool, OsString)> = read
        .filter_map(|e| e.ok())
        .map(|e| {
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (is_dir, e.file_name())
        })
        .collect();
    // Directories first, then alphabetical.
    entries.sort_by(|a, b| (!a.0, &a.1).cmp(&(!b.0, &b.1)));

    let last = entries.len().saturating_sub(1);
    for (i, (is_dir, name)) in entries.iter().enumerate() {
        out.push_str(prefix);
        out.push_str("+-- ");
        out.push_str(&name.to_string_lossy());
        out.push('\n');

        if *is_dir && depth < max_depth {
            let continuation = if i == last { "    " } else { "|   " };
            walk(
                &dir.join(name),
                &format!("{prefix}{continuation}"),
                depth + 1,
                max_depth,
                out,
            );
        }
    }
}
