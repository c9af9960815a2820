use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use console::style;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

/// Writes rendered output to stdout, or to `path` when given. Parent
/// directories are created; `append` adds to an existing file.
pub fn write_output(content: &str, path: Option<&Path>, append: bool) -> io::Result<()> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        return stdout.flush();
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    info(&format!("Wrote dependency tree to: {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parent_directories_and_truncates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("target").join("tree.txt");

        write_output("first\n", Some(&path), false).expect("write");
        write_output("second\n", Some(&path), false).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "second\n");
    }

    #[test]
    fn appends_when_requested() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.txt");

        write_output("first\n", Some(&path), false).expect("write");
        write_output("second\n", Some(&path), true).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "first\nsecond\n");
    }
}
