/// Collapse `.`/`..` segments and separators of a `/`-separated path.
///
/// Backslashes are treated as separators, so paths collected on Windows normalise the same way.
/// Empty and `.` segments disappear. A `..` removes the preceding segment; when there is nothing
/// left to remove it is kept, so the result may start with one or more `..` segments. The result
/// never starts or ends with `/`.
pub fn normalize_segments(path: &str) -> String {
  let unified = path.replace('\\', "/");
  let mut segments: Vec<&str> = Vec::new();

  for segment in unified.split('/') {
    match segment {
      "" | "." => {}
      ".." => match segments.last() {
        Some(&last) if last != ".." => {
          segments.pop();
        }
        _ => segments.push(".."),
      },
      other => segments.push(other),
    }
  }

  segments.join("/")
}

/// Returns `true` when a normalised path climbs above its root.
pub fn escapes_root(normalized: &str) -> bool {
  normalized == ".." || normalized.starts_with("../")
}
