//! `build.zbld` project manifests and linking of assembled units.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;

/// One entry of the manifest as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    pub name: String,
    /// `None` places the entry right after the previous one.
    pub address: Option<u16>,
}

/// A source file to assemble, after directory entries are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub path: PathBuf,
    pub address: Option<u16>,
}

pub struct BuildFile;

impl BuildFile {
    pub const NAME: &'static str = "build.zbld";

    /// Whitespace separated words. `0x<hex>` sets the load address, which the
    /// next entry consumes; every other word names a file or directory.
    pub fn parse(text: &str) -> Result<Vec<BuildEntry>, Error> {
        let mut entries = vec![];
        let mut address = None;
        for word in text.split_whitespace() {
            if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
                let value = u16::from_str_radix(hex, 16)
                    .map_err(|_| Error::BuildAddress(word.to_string()))?;
                address = Some(value);
            } else {
                entries.push(BuildEntry {
                    name: word.to_string(),
                    address: address.take(),
                });
            }
        }
        Ok(entries)
    }

    /// Reads `dir/build.zbld`. Entries naming a directory under `dir/src`
    /// expand to the files in it, sorted by name.
    pub fn load(dir: &Path) -> Result<Vec<BuildStep>, Error> {
        let manifest = dir.join(Self::NAME);
        let text = fs::read_to_string(&manifest)
            .map_err(|e| Error::FileOpen(manifest.display().to_string(), e))?;
        let src = dir.join("src");

        let mut steps = vec![];
        for entry in Self::parse(&text)? {
            let path = src.join(&entry.name);
            if !path.is_dir() {
                steps.push(BuildStep {
                    path,
                    address: entry.address,
                });
                continue;
            }
            let mut files = fs::read_dir(&path)
                .map_err(|e| Error::DirRead(path.display().to_string(), e))?
                .map(|f| f.map(|f| f.path()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| Error::DirRead(path.display().to_string(), e))?;
            files.retain(|f| f.is_file());
            files.sort();
            let mut address = entry.address;
            for file in files {
                steps.push(BuildStep {
                    path: file,
                    address: address.take(),
                });
            }
        }
        debug!(steps = steps.len(), "build file loaded");
        Ok(steps)
    }
}

/// Assembled bytes of one build step.
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub address: Option<u16>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub base: u16,
    pub bytes: Vec<u8>,
}

/// Lays units out in order starting at the first one's address. Floating
/// units follow the previous one and gaps are zero-filled.
pub fn link(units: &[Unit]) -> Result<Image, Error> {
    let base = units.first().and_then(|u| u.address).unwrap_or(0);
    let mut bytes: Vec<u8> = vec![];
    let mut end = base as u32;
    for unit in units {
        let at = match unit.address {
            Some(at) if (at as u32) < end => {
                return Err(Error::Overlap {
                    name: unit.name.clone(),
                    at,
                    end,
                })
            }
            Some(at) => at as u32,
            None => end,
        };
        let unit_end = at + unit.bytes.len() as u32;
        if unit_end > 0x10000 {
            return Err(Error::ImageOverflow(unit.name.clone(), unit_end));
        }
        bytes.resize((at - base as u32) as usize, 0);
        bytes.extend_from_slice(&unit.bytes);
        end = unit_end;
    }
    debug!(base, len = bytes.len(), "linked");
    Ok(Image { base, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, address: Option<u16>) -> BuildEntry {
        BuildEntry {
            name: name.into(),
            address,
        }
    }

    fn unit(name: &str, address: Option<u16>, bytes: &[u8]) -> Unit {
        Unit {
            name: name.into(),
            address,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn parse_addresses() {
        let entries = BuildFile::parse("0x0000 boot.z80 lib\n0x8000\n  main.z80 tail.z80\n").unwrap();
        assert_eq!(
            entries,
            vec![
                entry("boot.z80", Some(0)),
                entry("lib", None),
                entry("main.z80", Some(0x8000)),
                entry("tail.z80", None),
            ]
        );
    }

    #[test]
    fn parse_without_address() {
        let entries = BuildFile::parse("a.z80 b.z80").unwrap();
        assert_eq!(entries, vec![entry("a.z80", None), entry("b.z80", None)]);
    }

    #[test]
    fn parse_bad_address() {
        assert!(matches!(
            BuildFile::parse("0xZZ a.z80"),
            Err(Error::BuildAddress(word)) if word == "0xZZ"
        ));
        assert!(BuildFile::parse("0x10000 a.z80").is_err());
    }

    #[test]
    fn load_project() {
        let dir = std::env::temp_dir().join(format!("zasm-build-{}", std::process::id()));
        let lib = dir.join("src").join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(dir.join(BuildFile::NAME), "0x100 main.z80 lib").unwrap();
        fs::write(dir.join("src").join("main.z80"), "nop").unwrap();
        fs::write(lib.join("b.z80"), "nop").unwrap();
        fs::write(lib.join("a.z80"), "nop").unwrap();

        let steps = BuildFile::load(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(
            steps,
            vec![
                BuildStep {
                    path: dir.join("src").join("main.z80"),
                    address: Some(0x100)
                },
                BuildStep {
                    path: lib.join("a.z80"),
                    address: None
                },
                BuildStep {
                    path: lib.join("b.z80"),
                    address: None
                },
            ]
        );
    }

    #[test]
    fn link_gaps_and_floating() {
        let image = link(&[
            unit("a", Some(0x10), &[1, 2]),
            unit("b", None, &[3]),
            unit("c", Some(0x15), &[4]),
        ])
        .unwrap();
        assert_eq!(image.base, 0x10);
        assert_eq!(image.bytes, vec![1, 2, 3, 0, 0, 4]);
    }

    #[test]
    fn link_overlap() {
        let result = link(&[unit("a", Some(0x10), &[1, 2, 3]), unit("b", Some(0x11), &[4])]);
        assert!(matches!(
            result,
            Err(Error::Overlap { name, at: 0x11, end: 0x13 }) if name == "b"
        ));
    }

    #[test]
    fn link_overflow() {
        let result = link(&[unit("a", Some(0xFFFF), &[1, 2])]);
        assert!(matches!(result, Err(Error::ImageOverflow(_, 0x10001))));
    }

    #[test]
    fn link_empty() {
        assert_eq!(link(&[]).unwrap(), Image { base: 0, bytes: vec![] });
    }
}
