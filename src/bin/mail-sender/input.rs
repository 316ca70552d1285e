use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use recipient_lib::recipients::split_fields;

/// Chemin d'un fichier régulier (lien symbolique exclu), tel quel puis relatif
/// au répertoire courant.
pub fn check_file(name: &str) -> Option<PathBuf> {
    if name.trim().is_empty() {
        return None;
    }
    let given = PathBuf::from(name);
    let from_cwd = env::current_dir().ok().map(|cwd| cwd.join(&given));
    std::iter::once(given)
        .chain(from_cwd)
        .find(|path| is_regular_file(path))
}

fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_file())
}

/// The file's contents when `body` names a regular file, the text itself
/// otherwise.
pub fn parse_body(body: &str) -> Result<String> {
    match check_file(body) {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("read body file {}", path.display())),
        None => Ok(body.to_string()),
    }
}

pub fn parse_attachments(spec: &str, separator: &str) -> Result<Vec<PathBuf>> {
    split_fields(spec, separator)
        .map(|name| check_file(name).ok_or_else(|| anyhow!("attachment {name:?} is not a regular file")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("mail-sender-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn literal_body() {
        assert_eq!(parse_body("Hello team").unwrap(), "Hello team");
        assert_eq!(parse_body("").unwrap(), "");
    }

    #[test]
    fn body_from_file() {
        let path = temp_file("body.html", "<p>report</p>");
        let body = parse_body(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(body, "<p>report</p>");
    }

    #[test]
    fn directories_are_not_files() {
        assert!(check_file(env::temp_dir().to_str().unwrap()).is_none());
    }

    #[test]
    fn attachments_must_exist() {
        let first = temp_file("a.txt", "a");
        let second = temp_file("b.txt", "b");
        let spec = format!("{} ; {}", first.display(), second.display());

        let attachments = parse_attachments(&spec, ";").unwrap();
        assert_eq!(attachments, [first.clone(), second.clone()]);

        let missing = format!("{},/nonexistent/mail-sender/c.txt", first.display());
        assert!(parse_attachments(&missing, ",").is_err());

        fs::remove_file(&first).ok();
        fs::remove_file(&second).ok();
        assert!(parse_attachments("", ",").unwrap().is_empty());
    }
}
