use crate::error::{I18nError, I18nResult};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialize `value` as JSON indented with four spaces
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T, origin: &Path) -> I18nResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| I18nError::json(origin, e.to_string()))?;
    String::from_utf8(buf).map_err(|e| I18nError::json(origin, e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the contents of `path` by writing a sibling temp file and renaming it
///
/// Readers never observe a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> I18nResult<()> {
    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp).map_err(|e| I18nError::io(&tmp, e))?;
        file.write_all(contents)
            .map_err(|e| I18nError::io(&tmp, e))?;
        file.sync_all().map_err(|e| I18nError::io(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| I18nError::io(path, e))
}

/// Write `value` as four-space indented JSON
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> I18nResult<()> {
    let json = to_pretty_json(value, path)?;
    write_atomic(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let mut map = BTreeMap::new();
        map.insert("de", 3);
        let json = to_pretty_json(&map, Path::new("x.json")).unwrap();
        assert_eq!(json, "{\n    \"de\": 3\n}");
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "old contents that are longer").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("out.json.tmp").exists());
    }
}
